use crate::application::use_cases::WorkflowController;
use crate::domain::design::{DownloadTarget, ExportError};
use std::sync::Arc;
use tracing::info;

/// 結果画像をダウンロード先へ保存するユースケース
pub struct ExportResultUseCase {
    controller: Arc<WorkflowController>,
    target: Arc<dyn DownloadTarget>,
}

impl ExportResultUseCase {
    pub fn new(controller: Arc<WorkflowController>, target: Arc<dyn DownloadTarget>) -> Self {
        Self { controller, target }
    }

    pub async fn execute(&self) -> Result<String, ExportError> {
        let result = self.controller.result().await.ok_or(ExportError::NoResult)?;
        let location = self.target.deliver(&result)?;
        info!(
            location = %location,
            encoding = ?result.encoding,
            "結果画像を保存しました"
        );
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::design::ProductType;
    use crate::domain::shared::ImageBlob;
    use crate::infrastructure::capture::InMemoryPreviewStore;
    use crate::infrastructure::download::DirectoryDownloadTarget;
    use crate::infrastructure::remote::MockDesignService;

    fn controller(service: MockDesignService) -> Arc<WorkflowController> {
        Arc::new(WorkflowController::new(
            Arc::new(service),
            Arc::new(InMemoryPreviewStore::new()),
        ))
    }

    #[tokio::test]
    async fn test_export_without_result_fails() {
        let dir = tempfile::tempdir().unwrap();
        let use_case = ExportResultUseCase::new(
            controller(MockDesignService::new()),
            Arc::new(DirectoryDownloadTarget::new(dir.path())),
        );
        assert!(matches!(use_case.execute().await, Err(ExportError::NoResult)));
    }

    #[tokio::test]
    async fn test_export_extracted_result_as_png() {
        let dir = tempfile::tempdir().unwrap();
        let controller = controller(
            MockDesignService::new()
                .with_description("logo")
                .with_extracted(b"transparent".to_vec()),
        );
        controller
            .select_images(vec![ImageBlob::jpeg(b"photo".to_vec())])
            .await
            .unwrap();
        controller.request_description(ProductType::Mug).await.unwrap();
        controller
            .request_extract_original(ProductType::Mug)
            .await
            .unwrap();

        let use_case = ExportResultUseCase::new(
            controller,
            Arc::new(DirectoryDownloadTarget::new(dir.path())),
        );
        let location = use_case.execute().await.unwrap();
        assert!(location.ends_with("brand-extractor-design.png"));
        let saved = std::fs::read(dir.path().join("brand-extractor-design.png")).unwrap();
        assert_eq!(saved, b"transparent");
    }
}
