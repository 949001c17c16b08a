//! キャプチャ集約
//!
//! ファイル選択、カメラ撮影、360°スキャンによる画像取得を扱うモジュール

pub mod entities;
pub mod errors;
pub mod repositories;
pub mod value_objects;
pub mod wizard;

pub use entities::*;
pub use errors::*;
pub use repositories::*;
pub use value_objects::*;
pub use wizard::*;
