//! 共有値オブジェクト
//!
//! 画像データとプレビューハンドルを定義

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_PNG: &str = "image/png";

/// 画像データ
///
/// バイト列は共有参照で保持するため、複製してもコピーは発生しない
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBlob {
    data: Arc<[u8]>,
    mime_type: String,
}

impl ImageBlob {
    /// 新しい画像データを作成
    pub fn new(data: impl Into<Arc<[u8]>>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// JPEG画像として作成
    pub fn jpeg(data: impl Into<Arc<[u8]>>) -> Self {
        Self::new(data, MIME_JPEG)
    }

    /// PNG画像として作成
    pub fn png(data: impl Into<Arc<[u8]>>) -> Self {
        Self::new(data, MIME_PNG)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// MIMEタイプが `image/*` かチェック
    pub fn is_image(&self) -> bool {
        is_image_mime(&self.mime_type)
    }
}

impl fmt::Debug for ImageBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageBlob")
            .field("mime_type", &self.mime_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// MIMEタイプが画像を表すかチェック
pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type
        .split(';')
        .next()
        .map(|essence| essence.trim().to_ascii_lowercase().starts_with("image/"))
        .unwrap_or(false)
}

/// プレビューハンドル
///
/// キャプチャ画像の表示用リソースを識別する。不要になったら必ず解放すること
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PreviewHandle(Uuid);

impl PreviewHandle {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl FromStr for PreviewHandle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| format!("Invalid preview handle: {e}"))
    }
}

impl fmt::Display for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_blob_shares_bytes() {
        let blob = ImageBlob::jpeg(vec![1u8, 2, 3]);
        let copy = blob.clone();
        assert_eq!(blob, copy);
        assert_eq!(copy.data(), &[1, 2, 3]);
        assert_eq!(copy.mime_type(), "image/jpeg");
        assert!(copy.is_image());
        assert_eq!(format!("{copy:?}"), "ImageBlob { mime_type: \"image/jpeg\", len: 3 }");
    }

    #[test]
    fn test_is_image_mime() {
        assert!(is_image_mime("image/png"));
        assert!(is_image_mime("IMAGE/WEBP; q=1"));
        assert!(!is_image_mime("application/pdf"));
        assert!(!is_image_mime(""));
    }

    #[test]
    fn test_preview_handle_parse() {
        let handle = PreviewHandle::generate();
        let parsed: PreviewHandle = handle.to_string().parse().unwrap();
        assert_eq!(handle, parsed);
        assert!("not-a-uuid".parse::<PreviewHandle>().is_err());
    }
}
