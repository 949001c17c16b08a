//! セッション操作のハンドラ

use super::error_response::ErrorResponse;
use super::models::{ProductRequest, SessionView};
use super::state::AppState;
use crate::application::use_cases::CaptureSnapshotUseCase;
use crate::domain::design::ExportError;
use crate::domain::shared::PreviewHandle;
use crate::infrastructure::capture::FileImageSource;
use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, Path, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{info, warn};

/// アップロードのフィールド名
const FILE_FIELD: &str = "file";

pub async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    Json(state.workflow.snapshot().await.into())
}

/// 画像をアップロードして選択する
pub async fn upload_images(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<SessionView>, ErrorResponse> {
    let mut images = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ErrorResponse::bad_request(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let filename = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| ErrorResponse::bad_request(e.to_string()))?;

        let image =
            FileImageSource::from_upload(data.to_vec(), content_type.as_deref(), filename.as_deref())
                .inspect_err(|e| warn!("アップロードを拒否: {}", e))?;
        images.push(image);
    }

    info!(count = images.len(), "画像を受信しました");
    let snapshot = state.workflow.select_images(images).await?;
    Ok(Json(snapshot.into()))
}

/// ブラウザのカメラで撮影した1枚を選択する
pub async fn capture_snapshot(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SessionView>, ErrorResponse> {
    let frame = FileImageSource::from_upload(
        body.to_vec(),
        headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("capture.jpg"),
    )?;
    state.camera.push_frame(frame)?;

    let image = CaptureSnapshotUseCase::new(state.camera.clone()).execute()?;
    let snapshot = state.workflow.select_images(vec![image]).await?;
    Ok(Json(snapshot.into()))
}

pub async fn describe_design(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ProductRequest>,
) -> Result<Json<SessionView>, ErrorResponse> {
    let product = request.product_type()?;
    let snapshot = state.workflow.request_description(product).await?;
    Ok(Json(snapshot.into()))
}

pub async fn recreate_design(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionView>, ErrorResponse> {
    let snapshot = state.workflow.request_recreate().await?;
    Ok(Json(snapshot.into()))
}

pub async fn extract_design(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ProductRequest>,
) -> Result<Json<SessionView>, ErrorResponse> {
    let product = request.product_type()?;
    let snapshot = state.workflow.request_extract_original(product).await?;
    Ok(Json(snapshot.into()))
}

pub async fn reset_session(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    Json(state.workflow.reset().await.into())
}

/// 結果画像をダウンロードさせる
pub async fn download_result(
    State(state): State<Arc<AppState>>,
) -> Result<Response, ErrorResponse> {
    let result = state
        .workflow
        .result()
        .await
        .ok_or(ExportError::NoResult)?;

    let disposition = format!("attachment; filename=\"{}\"", result.download_filename());
    Ok((
        [
            (header::CONTENT_TYPE, result.mime_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        result.image.data().to_vec(),
    )
        .into_response())
}

pub async fn get_preview(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ErrorResponse> {
    let handle: PreviewHandle = id
        .parse()
        .map_err(|_| ErrorResponse::not_found(format!("Preview not found: {id}")))?;
    let image = state
        .previews
        .get(&handle)
        .ok_or_else(|| ErrorResponse::not_found(format!("Preview not found: {id}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, image.mime_type().to_string()),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        image.data().to_vec(),
    )
        .into_response())
}
