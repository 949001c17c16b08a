use crate::domain::shared::value_objects::{ImageBlob, PreviewHandle};

/// 撮影された1枚の画像とそのプレビュー
///
/// キャプチャセッションが終了するまでキャプチャプロバイダーが所有する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub image: ImageBlob,
    pub preview: PreviewHandle,
}

impl Capture {
    pub fn new(image: ImageBlob, preview: PreviewHandle) -> Self {
        Self { image, preview }
    }
}
