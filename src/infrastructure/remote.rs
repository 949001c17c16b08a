pub mod gemini_client;
pub mod mock_design_service;

pub use gemini_client::GeminiDesignService;
pub use mock_design_service::{MockCallCounts, MockDesignService};
