use crate::application::use_cases::{ScanSession, WorkflowController};
use crate::domain::capture::PreviewStore;
use crate::domain::design::DesignService;
use crate::infrastructure::capture::{FrameRelayCamera, InMemoryPreviewStore};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

/// Web サーバーの共有状態
pub struct AppState {
    pub workflow: Arc<WorkflowController>,
    pub camera: Arc<FrameRelayCamera>,
    pub previews: Arc<dyn PreviewStore>,
    pub scanner: Mutex<Option<ScanSession>>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(service: Arc<dyn DesignService>) -> Self {
        let previews: Arc<dyn PreviewStore> = Arc::new(InMemoryPreviewStore::new());
        Self {
            workflow: Arc::new(WorkflowController::new(service, previews.clone())),
            camera: Arc::new(FrameRelayCamera::new()),
            previews,
            scanner: Mutex::new(None),
            started_at: Instant::now(),
        }
    }

    pub fn provider_name(&self) -> &str {
        self.workflow.provider_name()
    }
}
