use super::error_response::ErrorResponse;
use crate::application::use_cases::ScanProgress;
use crate::domain::design::{ProductType, SessionSnapshot};
use crate::domain::shared::PreviewHandle;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub version: String,
    pub build_timestamp: String,
    pub os: String,
    pub arch: String,
    pub provider: String,
    pub started_at: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// 画面表示用のセッション
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub snapshot: SessionSnapshot,
    pub preview_urls: Vec<String>,
    /// 1枚なら1列、それ以外は2列
    pub grid_columns: u8,
    pub result_url: Option<String>,
    pub product_types: Vec<ProductOption>,
}

impl From<SessionSnapshot> for SessionView {
    fn from(snapshot: SessionSnapshot) -> Self {
        let grid_columns = if snapshot.previews.len() == 1 { 1 } else { 2 };
        let result_url = snapshot
            .result
            .as_ref()
            .map(|_| "/api/session/result".to_string());

        Self {
            preview_urls: preview_urls(&snapshot.previews),
            grid_columns,
            result_url,
            product_types: ProductType::ALL
                .iter()
                .map(|product| ProductOption {
                    value: product.as_str(),
                    label: product.label(),
                })
                .collect(),
            snapshot,
        }
    }
}

/// 画面表示用のスキャン状態
#[derive(Debug, Clone, Serialize)]
pub struct ScanView {
    pub active: bool,
    pub progress: Option<ScanProgress>,
    pub preview_urls: Vec<String>,
}

impl ScanView {
    pub fn inactive() -> Self {
        Self {
            active: false,
            progress: None,
            preview_urls: Vec::new(),
        }
    }
}

impl From<ScanProgress> for ScanView {
    fn from(progress: ScanProgress) -> Self {
        Self {
            active: !progress.closed,
            preview_urls: preview_urls(&progress.previews),
            progress: Some(progress),
        }
    }
}

/// 説明取得・抽出のリクエスト
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductRequest {
    #[serde(default)]
    pub product_type: Option<String>,
}

impl ProductRequest {
    /// 省略時は既定の商品種別
    pub fn product_type(&self) -> Result<ProductType, ErrorResponse> {
        match &self.product_type {
            Some(value) => value
                .parse()
                .map_err(|message: String| ErrorResponse::new(StatusCode::UNPROCESSABLE_ENTITY, message)),
            None => Ok(ProductType::default()),
        }
    }
}

pub fn preview_url(handle: &PreviewHandle) -> String {
    format!("/api/previews/{handle}")
}

fn preview_urls(handles: &[PreviewHandle]) -> Vec<String> {
    handles.iter().map(preview_url).collect()
}
