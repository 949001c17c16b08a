pub mod file_image_source;
pub mod frame_relay_camera;
pub mod mock_camera;
pub mod preview_store;
pub mod spool_camera;
pub mod stream_lease;

pub use file_image_source::FileImageSource;
pub use frame_relay_camera::FrameRelayCamera;
pub use mock_camera::MockCamera;
pub use preview_store::InMemoryPreviewStore;
pub use spool_camera::SpoolDirectoryCamera;
pub use stream_lease::{StreamGate, StreamLease};
