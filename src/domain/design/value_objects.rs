//! デザイン集約の値オブジェクト

use crate::domain::shared::value_objects::{MIME_JPEG, MIME_PNG};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 商品の種類
///
/// プロンプト文面の調整にのみ使用する
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProductType {
    #[serde(rename = "item")]
    Item,
    #[default]
    #[serde(rename = "t-shirt")]
    TShirt,
    #[serde(rename = "mug")]
    Mug,
}

impl ProductType {
    pub const ALL: [ProductType; 3] = [ProductType::TShirt, ProductType::Mug, ProductType::Item];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Item => "item",
            ProductType::TShirt => "t-shirt",
            ProductType::Mug => "mug",
        }
    }

    /// 画面表示用のラベル
    pub fn label(&self) -> &'static str {
        match self {
            ProductType::Item => "Other Item",
            ProductType::TShirt => "T-Shirt",
            ProductType::Mug => "Mug",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "item" | "generic" | "other" => Ok(ProductType::Item),
            "t-shirt" | "tshirt" | "shirt" => Ok(ProductType::TShirt),
            "mug" => Ok(ProductType::Mug),
            other => Err(format!(
                "Unknown product type '{other}' (expected one of: t-shirt, mug, item)"
            )),
        }
    }
}

/// 実行中のリモート操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingOperation {
    #[default]
    None,
    Describing,
    Recreating,
    Extracting,
}

impl PendingOperation {
    pub fn is_active(&self) -> bool {
        !matches!(self, PendingOperation::None)
    }

    /// ローディング表示の文言
    pub fn loading_text(&self) -> Option<&'static str> {
        match self {
            PendingOperation::None => None,
            PendingOperation::Describing => Some("AI is analyzing your image(s)..."),
            PendingOperation::Recreating => Some("AI is recreating the design..."),
            PendingOperation::Extracting => Some("AI is extracting the original design..."),
        }
    }
}

impl fmt::Display for PendingOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PendingOperation::None => "none",
            PendingOperation::Describing => "describing",
            PendingOperation::Recreating => "recreating",
            PendingOperation::Extracting => "extracting",
        };
        f.write_str(name)
    }
}

/// ワークフローの状態
///
/// セッションのフィールドから導出される。単独では保持しない
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Empty,
    DescriptionPending,
    DescriptionReady,
    ResultPending,
    ResultReady,
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowState::Empty => "empty",
            WorkflowState::DescriptionPending => "description-pending",
            WorkflowState::DescriptionReady => "description-ready",
            WorkflowState::ResultPending => "result-pending",
            WorkflowState::ResultReady => "result-ready",
        };
        f.write_str(name)
    }
}

/// 結果画像のエンコーディング
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultEncoding {
    /// 再生成結果（不透明な白背景）
    Jpeg,
    /// 抽出結果（透過背景）
    Png,
}

impl ResultEncoding {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ResultEncoding::Jpeg => MIME_JPEG,
            ResultEncoding::Png => MIME_PNG,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ResultEncoding::Jpeg => "jpeg",
            ResultEncoding::Png => "png",
        }
    }

    pub fn is_transparent(&self) -> bool {
        matches!(self, ResultEncoding::Png)
    }
}

/// リモートサービスの操作種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignOperation {
    Describe,
    Recreate,
    Extract,
}

impl fmt::Display for DesignOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DesignOperation::Describe => "description",
            DesignOperation::Recreate => "recreate",
            DesignOperation::Extract => "extract",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_type_parse() {
        assert_eq!("mug".parse::<ProductType>().unwrap(), ProductType::Mug);
        assert_eq!(" T-Shirt ".parse::<ProductType>().unwrap(), ProductType::TShirt);
        assert_eq!("generic".parse::<ProductType>().unwrap(), ProductType::Item);
        assert!("hat".parse::<ProductType>().is_err());
        assert_eq!(ProductType::default(), ProductType::TShirt);
    }

    #[test]
    fn test_product_type_serde_tags() {
        let json = serde_json::to_string(&ProductType::TShirt).unwrap();
        assert_eq!(json, "\"t-shirt\"");
        let parsed: ProductType = serde_json::from_str("\"mug\"").unwrap();
        assert_eq!(parsed, ProductType::Mug);
    }

    #[test]
    fn test_loading_text() {
        assert_eq!(PendingOperation::None.loading_text(), None);
        assert!(!PendingOperation::None.is_active());
        assert_eq!(
            PendingOperation::Extracting.loading_text(),
            Some("AI is extracting the original design...")
        );
    }

    #[test]
    fn test_result_encoding_extension() {
        assert_eq!(ResultEncoding::Png.extension(), "png");
        assert_eq!(ResultEncoding::Png.mime_type(), "image/png");
        assert!(ResultEncoding::Png.is_transparent());
        assert_eq!(ResultEncoding::Jpeg.extension(), "jpeg");
        assert!(!ResultEncoding::Jpeg.is_transparent());
    }
}
