//! ドメイン層
//!
//! ビジネスロジックとドメインモデルを含む層

pub mod capture;
pub mod design;
pub mod shared;
