//! ファイル選択による画像取得
//!
//! 画像かどうかは MIME タイプのみで判定する（宣言された Content-Type、なければ拡張子）

use crate::domain::capture::CaptureError;
use crate::domain::shared::ImageBlob;
use crate::domain::shared::value_objects::is_image_mime;
use std::path::Path;
use tracing::{debug, warn};

pub struct FileImageSource;

impl FileImageSource {
    /// 拡張子から画像の MIME タイプを推定
    pub fn image_mime_for_path(path: &Path) -> Option<String> {
        mime_guess::from_path(path)
            .first()
            .map(|mime| mime.essence_str().to_string())
            .filter(|mime| is_image_mime(mime))
    }

    /// 画像ファイルを1枚読み込む
    pub fn load(path: &Path) -> Result<ImageBlob, CaptureError> {
        let mime_type = Self::image_mime_for_path(path)
            .ok_or_else(|| CaptureError::UnsupportedMediaType(path.display().to_string()))?;

        let data = std::fs::read(path).map_err(|e| {
            warn!("画像ファイルを読み込めません: {} ({})", path.display(), e);
            CaptureError::FileRead {
                path: path.display().to_string(),
                message: e.to_string(),
            }
        })?;

        debug!(path = %path.display(), bytes = data.len(), mime = %mime_type, "画像ファイルを読み込みました");
        Ok(ImageBlob::new(data, mime_type))
    }

    /// 複数の画像ファイルを選択順に読み込む
    pub fn load_all<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<ImageBlob>, CaptureError> {
        paths.iter().map(|path| Self::load(path.as_ref())).collect()
    }

    /// アップロードされたデータを画像として受け付ける
    pub fn from_upload(
        data: Vec<u8>,
        content_type: Option<&str>,
        filename: Option<&str>,
    ) -> Result<ImageBlob, CaptureError> {
        let declared = content_type
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_ascii_lowercase())
            .filter(|mime| is_image_mime(mime));
        let mime_type = declared
            .or_else(|| filename.and_then(|name| Self::image_mime_for_path(Path::new(name))))
            .ok_or_else(|| {
                CaptureError::UnsupportedMediaType(
                    content_type
                        .or(filename)
                        .unwrap_or("application/octet-stream")
                        .to_string(),
                )
            })?;

        if data.is_empty() {
            return Err(CaptureError::FileRead {
                path: filename.unwrap_or("upload").to_string(),
                message: "empty file".to_string(),
            });
        }
        Ok(ImageBlob::new(data, mime_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_image_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shirt.png");
        std::fs::write(&path, b"png-bytes").unwrap();

        let image = FileImageSource::load(&path).unwrap();
        assert_eq!(image.mime_type(), "image/png");
        assert_eq!(image.data(), b"png-bytes");
    }

    #[test]
    fn test_non_image_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        assert!(matches!(
            FileImageSource::load(&path),
            Err(CaptureError::UnsupportedMediaType(_))
        ));
    }

    #[test]
    fn test_missing_file_is_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let error = FileImageSource::load(&dir.path().join("gone.jpg")).unwrap_err();
        assert!(matches!(error, CaptureError::FileRead { .. }));
    }

    #[test]
    fn test_upload_prefers_declared_content_type() {
        let image =
            FileImageSource::from_upload(b"x".to_vec(), Some("image/webp"), Some("a.jpg")).unwrap();
        assert_eq!(image.mime_type(), "image/webp");

        let image =
            FileImageSource::from_upload(b"x".to_vec(), Some("application/octet-stream"), Some("a.jpg"))
                .unwrap();
        assert_eq!(image.mime_type(), "image/jpeg");

        assert!(FileImageSource::from_upload(b"x".to_vec(), Some("text/plain"), None).is_err());
        assert!(FileImageSource::from_upload(Vec::new(), Some("image/png"), None).is_err());
    }
}
