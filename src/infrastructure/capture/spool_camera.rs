//! スプールディレクトリカメラ
//!
//! テザー撮影やスマートフォンが書き込むディレクトリをカメラとして扱う。
//! フレーム取得のたびに未使用の画像ファイルを名前順で1枚消費する

use super::file_image_source::FileImageSource;
use super::stream_lease::{StreamGate, StreamLease};
use crate::domain::capture::{CameraDevice, CameraFacing, CameraStream, CaptureError};
use crate::domain::shared::ImageBlob;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

pub struct SpoolDirectoryCamera {
    directory: PathBuf,
    name: String,
    gate: StreamGate,
    consumed: Arc<Mutex<HashSet<PathBuf>>>,
}

impl SpoolDirectoryCamera {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        let directory = directory.into();
        let name = format!("spool:{}", directory.display());
        Self {
            directory,
            name,
            gate: StreamGate::new(),
            consumed: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn is_streaming(&self) -> bool {
        self.gate.is_active()
    }
}

impl CameraDevice for SpoolDirectoryCamera {
    fn open_stream(&self, facing: CameraFacing) -> Result<Box<dyn CameraStream>, CaptureError> {
        if !self.directory.is_dir() {
            return Err(CaptureError::CameraUnavailable(format!(
                "spool directory not found: {}",
                self.directory.display()
            )));
        }
        let lease = self.gate.acquire()?;
        info!(directory = %self.directory.display(), ?facing, "スプールカメラを開きました");

        Ok(Box::new(SpoolStream {
            _lease: lease,
            directory: self.directory.clone(),
            consumed: Arc::clone(&self.consumed),
        }))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

struct SpoolStream {
    _lease: StreamLease,
    directory: PathBuf,
    consumed: Arc<Mutex<HashSet<PathBuf>>>,
}

impl SpoolStream {
    /// 名前順で最も古い未使用の画像ファイル
    fn next_frame_path(&self, consumed: &HashSet<PathBuf>) -> Result<Option<PathBuf>, CaptureError> {
        // ディレクトリ名に含まれる `[` や `*` はパターンとして解釈させない
        let escaped = glob::Pattern::escape(&self.directory.to_string_lossy());
        let pattern = Path::new(&escaped).join("*");
        let entries = glob::glob(&pattern.to_string_lossy()).map_err(|e| {
            CaptureError::CameraUnavailable(format!("invalid spool directory: {e}"))
        })?;

        let mut candidates: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .filter(|path| path.is_file())
            .filter(|path| FileImageSource::image_mime_for_path(path).is_some())
            .filter(|path| !consumed.contains(path))
            .collect();
        candidates.sort();
        Ok(candidates.into_iter().next())
    }
}

impl CameraStream for SpoolStream {
    fn grab_frame(&mut self) -> Result<ImageBlob, CaptureError> {
        let mut consumed = self.consumed.lock().unwrap_or_else(|e| e.into_inner());
        let path = self
            .next_frame_path(&consumed)?
            .ok_or(CaptureError::NoFrame)?;

        let frame = FileImageSource::load(&path)?;
        debug!(path = %path.display(), "スプールからフレームを取得");
        consumed.insert(path);
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_are_consumed_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("002.jpg"), b"second").unwrap();
        std::fs::write(dir.path().join("001.jpg"), b"first").unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"ignored").unwrap();

        let camera = SpoolDirectoryCamera::new(dir.path());
        let mut stream = camera.open_stream(CameraFacing::Environment).unwrap();
        assert!(camera.is_streaming());

        assert_eq!(stream.grab_frame().unwrap().data(), b"first");
        assert_eq!(stream.grab_frame().unwrap().data(), b"second");
        assert_eq!(stream.grab_frame().unwrap_err(), CaptureError::NoFrame);

        drop(stream);
        assert!(!camera.is_streaming());
    }

    #[test]
    fn test_directory_name_with_glob_metacharacters() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("shots[1]");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("001.jpg"), b"front").unwrap();

        let camera = SpoolDirectoryCamera::new(&dir);
        let mut stream = camera.open_stream(CameraFacing::Environment).unwrap();
        assert_eq!(stream.grab_frame().unwrap().data(), b"front");
        assert_eq!(stream.grab_frame().unwrap_err(), CaptureError::NoFrame);
    }

    #[test]
    fn test_missing_directory_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let camera = SpoolDirectoryCamera::new(dir.path().join("missing"));
        let error = camera.open_stream(CameraFacing::Environment).err().unwrap();
        assert!(error.cancels_capture());
    }

    #[test]
    fn test_only_one_stream_at_a_time() {
        let dir = tempfile::tempdir().unwrap();
        let camera = SpoolDirectoryCamera::new(dir.path());
        let _stream = camera.open_stream(CameraFacing::Environment).unwrap();
        assert_eq!(
            camera.open_stream(CameraFacing::Environment).err(),
            Some(CaptureError::StreamInUse)
        );
    }
}
