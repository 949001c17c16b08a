//! 共有カーネル
//!
//! キャプチャ集約とデザイン集約の両方で使用される値オブジェクトを定義

pub mod value_objects;

pub use value_objects::{ImageBlob, PreviewHandle};
