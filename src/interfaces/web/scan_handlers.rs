//! 360°スキャンのハンドラ
//!
//! スキャンセッションはサーバーに1つだけ保持する

use super::error_response::ErrorResponse;
use super::models::{ScanView, SessionView};
use super::state::AppState;
use crate::application::use_cases::ScanSession;
use crate::domain::capture::CaptureError;
use crate::infrastructure::capture::FileImageSource;
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, header},
};
use std::sync::Arc;
use tracing::{info, warn};

pub async fn get_scan(State(state): State<Arc<AppState>>) -> Json<ScanView> {
    let scanner = state.scanner.lock().await;
    Json(
        scanner
            .as_ref()
            .map(|session| ScanView::from(session.progress()))
            .unwrap_or_else(ScanView::inactive),
    )
}

pub async fn start_scan(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ScanView>, ErrorResponse> {
    let mut scanner = state.scanner.lock().await;
    if scanner.as_ref().is_some_and(|session| !session.is_closed()) {
        return Err(CaptureError::StreamInUse.into());
    }

    let session = ScanSession::start(state.camera.as_ref(), state.previews.clone())?;
    let view = ScanView::from(session.progress());
    *scanner = Some(session);
    Ok(Json(view))
}

/// ブラウザから届いたフレームで現在のステップを撮影
pub async fn capture_scan_step(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ScanView>, ErrorResponse> {
    let mut scanner = state.scanner.lock().await;
    let session = scanner.as_mut().ok_or(CaptureError::ScanClosed)?;

    let frame = FileImageSource::from_upload(
        body.to_vec(),
        headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("scan.jpg"),
    )?;
    state.camera.push_frame(frame)?;

    let progress = session
        .capture()
        .inspect_err(|e| warn!("スキャン撮影に失敗: {}", e))?;
    Ok(Json(progress.into()))
}

/// 4枚揃ったスキャンを選択画像として渡す
pub async fn finish_scan(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionView>, ErrorResponse> {
    let images = {
        let mut scanner = state.scanner.lock().await;
        let session = scanner.as_mut().ok_or(CaptureError::ScanClosed)?;
        let images = session.finish()?;
        *scanner = None;
        images
    };

    info!(count = images.len(), "スキャン画像を選択します");
    let snapshot = state.workflow.select_images(images).await?;
    Ok(Json(snapshot.into()))
}

pub async fn cancel_scan(State(state): State<Arc<AppState>>) -> Json<ScanView> {
    if let Some(mut session) = state.scanner.lock().await.take() {
        session.cancel();
    }
    Json(ScanView::inactive())
}
