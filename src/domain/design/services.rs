use super::errors::DesignError;
use super::value_objects::ProductType;
use crate::domain::shared::value_objects::ImageBlob;
use async_trait::async_trait;

/// リモートデザインサービスのトレイト
///
/// 各メソッドは1回のリモート呼び出しに対応し、リトライは行わない
#[async_trait]
pub trait DesignService: Send + Sync {
    /// 画像からデザインの説明文を取得
    async fn describe(
        &self,
        images: &[ImageBlob],
        product: ProductType,
    ) -> Result<String, DesignError>;

    /// 説明文からデザインを再生成（正方形・不透明背景）
    async fn recreate(&self, description: &str) -> Result<ImageBlob, DesignError>;

    /// 画像から元のデザインを透過背景で抽出
    async fn extract_original(
        &self,
        images: &[ImageBlob],
        product: ProductType,
    ) -> Result<ImageBlob, DesignError>;

    fn provider_name(&self) -> &str;
}
