use crate::domain::capture::{CameraDevice, CameraFacing, CaptureError};
use crate::domain::shared::ImageBlob;
use std::sync::Arc;
use tracing::{info, warn};

/// カメラから1枚だけ撮影するユースケース
///
/// 撮影後はすぐにストリームを解放する
pub struct CaptureSnapshotUseCase {
    camera: Arc<dyn CameraDevice>,
}

impl CaptureSnapshotUseCase {
    pub fn new(camera: Arc<dyn CameraDevice>) -> Self {
        Self { camera }
    }

    pub fn execute(&self) -> Result<ImageBlob, CaptureError> {
        info!(camera = self.camera.name(), "カメラで撮影します");

        let mut stream = self
            .camera
            .open_stream(CameraFacing::Environment)
            .inspect_err(|e| warn!("カメラを取得できません: {}", e))?;
        let frame = stream.grab_frame();
        drop(stream);

        let frame = frame?;
        info!(bytes = frame.len(), mime = frame.mime_type(), "撮影しました");
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::capture::MockCamera;

    #[test]
    fn test_snapshot_releases_stream() {
        let camera = Arc::new(MockCamera::new());
        let use_case = CaptureSnapshotUseCase::new(camera.clone());

        let frame = use_case.execute().unwrap();
        assert_eq!(frame.mime_type(), "image/jpeg");
        assert!(!camera.is_streaming());
        assert_eq!(camera.opened_count(), 1);
    }

    #[test]
    fn test_unavailable_camera_cancels_capture() {
        let camera = Arc::new(MockCamera::unavailable());
        let use_case = CaptureSnapshotUseCase::new(camera.clone());

        let error = use_case.execute().unwrap_err();
        assert!(error.cancels_capture());
        assert!(!camera.is_streaming());
    }

    #[test]
    fn test_frame_failure_still_releases_stream() {
        let camera = Arc::new(MockCamera::new().with_frame_limit(0));
        let use_case = CaptureSnapshotUseCase::new(camera.clone());

        assert_eq!(use_case.execute(), Err(CaptureError::NoFrame));
        assert!(!camera.is_streaming());
    }
}
