//! アプリケーション層
//!
//! ドメインモデルを組み合わせたユースケースを提供

pub mod use_cases;
