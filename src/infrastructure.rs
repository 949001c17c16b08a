//! インフラストラクチャ層
//!
//! リモートデザインサービス、カメラ、プレビュー、ダウンロード先の実装

pub mod capture;
pub mod download;
pub mod remote;
