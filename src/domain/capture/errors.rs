use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Could not access camera: {0}")]
    CameraUnavailable(String),

    #[error("Camera stream is already in use")]
    StreamInUse,

    #[error("No frame available from camera")]
    NoFrame,

    #[error("Failed to read image file {path}: {message}")]
    FileRead { path: String, message: String },

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("All scan steps have already been captured")]
    ScanComplete,

    #[error("Scan is not complete: {captured} of {required} views captured")]
    ScanIncomplete { captured: usize, required: usize },

    #[error("Scan session has already ended")]
    ScanClosed,
}

impl CaptureError {
    /// キャプチャフローを中断してセレクターに戻るべきエラーかチェック
    pub fn cancels_capture(&self) -> bool {
        matches!(
            self,
            CaptureError::CameraUnavailable(_) | CaptureError::StreamInUse
        )
    }
}
