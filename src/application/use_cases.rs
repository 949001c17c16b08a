pub mod capture_snapshot;
pub mod export_result;
pub mod run_application;
pub mod scan_session;
pub mod workflow_controller;

pub use capture_snapshot::CaptureSnapshotUseCase;
pub use export_result::ExportResultUseCase;
pub use run_application::RunApplicationUseCase;
pub use scan_session::{ScanProgress, ScanSession, ScanStepInfo};
pub use workflow_controller::WorkflowController;
