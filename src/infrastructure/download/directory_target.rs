use crate::domain::design::{DesignResult, DownloadTarget, ExportError};
use std::path::PathBuf;
use tracing::info;

/// 結果画像をディレクトリへ書き出すダウンロード先
///
/// ファイル名は `brand-extractor-design.<ext>`。既存のファイルは上書きする
#[derive(Debug, Clone)]
pub struct DirectoryDownloadTarget {
    directory: PathBuf,
}

impl DirectoryDownloadTarget {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl DownloadTarget for DirectoryDownloadTarget {
    fn deliver(&self, result: &DesignResult) -> Result<String, ExportError> {
        let filename = result.download_filename();
        let path = self.directory.join(&filename);

        std::fs::create_dir_all(&self.directory)
            .and_then(|_| std::fs::write(&path, result.image.data()))
            .map_err(|source| ExportError::Write {
                filename: filename.clone(),
                source,
            })?;

        info!(path = %path.display(), bytes = result.image.len(), "ダウンロードを保存しました");
        Ok(path.display().to_string())
    }
}
