//! # Brand Extractor
//!
//! 商品の写真からブランドのデザインを読み取り、ホスト型のマルチモーダルAIサービスを使って
//! デザインを再生成、または透過背景で抽出するシステム
//!
//! このクレートは Domain-Driven Design (DDD) 原則に基づいて設計されており、
//! 以下の層に分かれています：
//!
//! - **Domain Layer**: セッションの状態機械、360°スキャンウィザード、外部サービスのポート
//! - **Application Layer**: ワークフローコントローラーとキャプチャのユースケース
//! - **Infrastructure Layer**: Gemini クライアント、カメラ、プレビュー管理、ファイル保存
//! - **Interface Layer**: Web UI と CLI

pub mod application;
pub mod config;
pub mod debug;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

// 公開API
pub use config::{AppConfig, ConfigError, RemoteServiceConfig, ServerConfig};
pub use domain::*;
