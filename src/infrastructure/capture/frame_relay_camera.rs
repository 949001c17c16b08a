//! フレームリレーカメラ
//!
//! 物理カメラはブラウザが `getUserMedia` で保持し、JPEG にエンコードしたフレームを
//! サーバーへ送信する。サーバー側のストリームは送信された最新フレームを取り出す

use super::stream_lease::{StreamGate, StreamLease};
use crate::domain::capture::{CameraDevice, CameraFacing, CameraStream, CaptureError};
use crate::domain::shared::ImageBlob;
use std::sync::{Arc, Mutex};
use tracing::debug;

type FrameSlot = Arc<Mutex<Option<ImageBlob>>>;

#[derive(Default)]
pub struct FrameRelayCamera {
    gate: StreamGate,
    latest: FrameSlot,
}

impl FrameRelayCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// ブラウザから届いたフレームを保持する。前のフレームは置き換えられる
    pub fn push_frame(&self, frame: ImageBlob) -> Result<(), CaptureError> {
        if !frame.is_image() {
            return Err(CaptureError::UnsupportedMediaType(
                frame.mime_type().to_string(),
            ));
        }
        if frame.is_empty() {
            return Err(CaptureError::NoFrame);
        }
        debug!(bytes = frame.len(), "フレームを受信");
        *self.latest.lock().unwrap_or_else(|e| e.into_inner()) = Some(frame);
        Ok(())
    }

    pub fn has_frame(&self) -> bool {
        self.latest
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    pub fn is_streaming(&self) -> bool {
        self.gate.is_active()
    }
}

impl CameraDevice for FrameRelayCamera {
    fn open_stream(&self, facing: CameraFacing) -> Result<Box<dyn CameraStream>, CaptureError> {
        let lease = self.gate.acquire()?;
        debug!(?facing, "リレーストリームを開きました");
        Ok(Box::new(RelayStream {
            _lease: lease,
            latest: Arc::clone(&self.latest),
        }))
    }

    fn name(&self) -> &str {
        "browser-relay"
    }
}

struct RelayStream {
    _lease: StreamLease,
    latest: FrameSlot,
}

impl CameraStream for RelayStream {
    fn grab_frame(&mut self) -> Result<ImageBlob, CaptureError> {
        self.latest
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
            .ok_or(CaptureError::NoFrame)
    }
}

impl Drop for RelayStream {
    // 解放時に残ったフレームを破棄する
    fn drop(&mut self) {
        self.latest.lock().unwrap_or_else(|e| e.into_inner()).take();
    }
}
