use crate::domain::capture::CaptureError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// カメラごとに1つだけストリームを許可するゲート
#[derive(Debug, Default)]
pub struct StreamGate {
    active: Arc<AtomicBool>,
    opened: AtomicUsize,
}

impl StreamGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// ストリームの使用権を取得。既に使用中なら `StreamInUse`
    pub fn acquire(&self) -> Result<StreamLease, CaptureError> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CaptureError::StreamInUse)?;
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(StreamLease {
            active: Arc::clone(&self.active),
        })
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// これまでに開いたストリームの数
    pub fn opened_count(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

/// ストリームの使用権。ドロップで解放される
#[derive(Debug)]
pub struct StreamLease {
    active: Arc<AtomicBool>,
}

impl Drop for StreamLease {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_lease_is_rejected_until_drop() {
        let gate = StreamGate::new();
        let lease = gate.acquire().unwrap();
        assert!(gate.is_active());
        assert_eq!(gate.acquire().unwrap_err(), CaptureError::StreamInUse);

        drop(lease);
        assert!(!gate.is_active());
        let _lease = gate.acquire().unwrap();
        assert_eq!(gate.opened_count(), 2);
    }
}
