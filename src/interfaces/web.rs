//! Web インターフェース
//!
//! HTTPベースのWeb APIと埋め込みWeb UIを提供します。
//! 画像の選択、カメラ撮影、360°スキャン、デザインの説明取得・再生成・抽出、
//! 結果のダウンロードなどの機能を含みます。

mod embedded_assets;
mod error_response;
mod handlers;
mod models;
mod scan_handlers;
mod session_handlers;
mod state;

pub mod server;

// 内部使用のため、必要な型のみを再エクスポート
pub use error_response::ErrorResponse;
pub use state::AppState;

pub(crate) use handlers::{get_system_info, health};
pub(crate) use scan_handlers::{cancel_scan, capture_scan_step, finish_scan, get_scan, start_scan};
pub(crate) use session_handlers::{
    capture_snapshot, describe_design, download_result, extract_design, get_preview, get_session,
    recreate_design, reset_session, upload_images,
};
