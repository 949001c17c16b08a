use super::stream_lease::{StreamGate, StreamLease};
use crate::domain::capture::{CameraDevice, CameraFacing, CameraStream, CaptureError};
use crate::domain::shared::ImageBlob;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// 合成フレームを返すカメラ
pub struct MockCamera {
    available: bool,
    frame_limit: Option<usize>,
    gate: StreamGate,
    frames_served: Arc<AtomicUsize>,
}

impl Default for MockCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCamera {
    pub fn new() -> Self {
        Self {
            available: true,
            frame_limit: None,
            gate: StreamGate::new(),
            frames_served: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// 権限が拒否されたカメラ
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// 指定枚数を返した後は `NoFrame`
    pub fn with_frame_limit(mut self, limit: usize) -> Self {
        self.frame_limit = Some(limit);
        self
    }

    pub fn is_streaming(&self) -> bool {
        self.gate.is_active()
    }

    pub fn opened_count(&self) -> usize {
        self.gate.opened_count()
    }

    pub fn frames_served(&self) -> usize {
        self.frames_served.load(Ordering::SeqCst)
    }
}

impl CameraDevice for MockCamera {
    fn open_stream(&self, facing: CameraFacing) -> Result<Box<dyn CameraStream>, CaptureError> {
        if !self.available {
            return Err(CaptureError::CameraUnavailable(
                "Permission denied".to_string(),
            ));
        }
        let lease = self.gate.acquire()?;
        debug!(?facing, "Mock camera stream opened");
        Ok(Box::new(MockStream {
            _lease: lease,
            frame_limit: self.frame_limit,
            frames_served: Arc::clone(&self.frames_served),
        }))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

struct MockStream {
    _lease: StreamLease,
    frame_limit: Option<usize>,
    frames_served: Arc<AtomicUsize>,
}

impl CameraStream for MockStream {
    fn grab_frame(&mut self) -> Result<ImageBlob, CaptureError> {
        let served = self.frames_served.load(Ordering::SeqCst);
        if self.frame_limit.is_some_and(|limit| served >= limit) {
            return Err(CaptureError::NoFrame);
        }
        self.frames_served.fetch_add(1, Ordering::SeqCst);
        Ok(ImageBlob::jpeg(format!("mock-frame-{}", served + 1).into_bytes()))
    }
}
