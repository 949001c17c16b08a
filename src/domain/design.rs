//! デザイン集約
//!
//! 撮影画像からデザイン説明を取得し、再生成・抽出した結果を保持するセッションを管理

pub mod entities;
pub mod errors;
pub mod prompts;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
pub use value_objects::*;
