use super::entities::DesignResult;
use super::errors::ExportError;

/// 結果画像の保存先
pub trait DownloadTarget: Send + Sync {
    /// 結果画像を保存し、保存先の場所を返す
    fn deliver(&self, result: &DesignResult) -> Result<String, ExportError>;
}
