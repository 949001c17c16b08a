use crate::domain::capture::CaptureError;
use crate::domain::design::{ExportError, WorkflowError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(status_code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            error: status_code
                .canonical_reason()
                .unwrap_or("Unknown Error")
                .to_string(),
            message: message.into(),
            status_code: status_code.as_u16(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status_code, Json(self)).into_response()
    }
}

impl From<WorkflowError> for ErrorResponse {
    fn from(error: WorkflowError) -> Self {
        match &error {
            WorkflowError::NoImages => Self::new(StatusCode::UNPROCESSABLE_ENTITY, error.to_string()),
            WorkflowError::InvalidTransition { .. } | WorkflowError::Busy(_) => {
                Self::new(StatusCode::CONFLICT, error.to_string())
            }
            // 画面にはプロバイダーのメッセージをそのまま出す
            WorkflowError::Remote(remote) => {
                Self::new(StatusCode::BAD_GATEWAY, remote.user_message())
            }
        }
    }
}

impl From<CaptureError> for ErrorResponse {
    fn from(error: CaptureError) -> Self {
        let status = match &error {
            CaptureError::CameraUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CaptureError::StreamInUse
            | CaptureError::ScanComplete
            | CaptureError::ScanIncomplete { .. }
            | CaptureError::ScanClosed => StatusCode::CONFLICT,
            CaptureError::NoFrame | CaptureError::UnsupportedMediaType(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            CaptureError::FileRead { .. } => StatusCode::BAD_REQUEST,
        };
        Self::new(status, error.to_string())
    }
}

impl From<ExportError> for ErrorResponse {
    fn from(error: ExportError) -> Self {
        match &error {
            ExportError::NoResult => Self::not_found(error.to_string()),
            ExportError::Write { .. } => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
            }
        }
    }
}
