use crate::domain::capture::PreviewStore;
use crate::domain::shared::{ImageBlob, PreviewHandle};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// メモリ上のプレビューストア
///
/// Web UI は `/api/previews/{id}` でここから画像を取得する
#[derive(Debug, Default)]
pub struct InMemoryPreviewStore {
    previews: RwLock<HashMap<PreviewHandle, ImageBlob>>,
}

impl InMemoryPreviewStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreviewStore for InMemoryPreviewStore {
    fn register(&self, image: &ImageBlob) -> PreviewHandle {
        let handle = PreviewHandle::generate();
        self.previews
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(handle, image.clone());
        debug!(preview = %handle, bytes = image.len(), "プレビューを登録");
        handle
    }

    fn get(&self, handle: &PreviewHandle) -> Option<ImageBlob> {
        self.previews
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(handle)
            .cloned()
    }

    fn release(&self, handle: &PreviewHandle) -> bool {
        let removed = self
            .previews
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(handle)
            .is_some();
        if removed {
            debug!(preview = %handle, "プレビューを解放");
        }
        removed
    }

    fn active_count(&self) -> usize {
        self.previews.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_get_release() {
        let store = InMemoryPreviewStore::new();
        let image = ImageBlob::jpeg(b"photo".to_vec());
        let handle = store.register(&image);

        assert_eq!(store.get(&handle), Some(image));
        assert_eq!(store.active_count(), 1);
        assert!(store.release(&handle));
        assert!(!store.release(&handle));
        assert_eq!(store.get(&handle), None);
        assert_eq!(store.active_count(), 0);
    }

    #[test]
    fn test_release_all_counts_only_live_handles() {
        let store = InMemoryPreviewStore::new();
        let first = store.register(&ImageBlob::jpeg(b"a".to_vec()));
        let second = store.register(&ImageBlob::jpeg(b"b".to_vec()));
        store.release(&first);

        assert_eq!(store.release_all(&[first, second]), 1);
        assert_eq!(store.active_count(), 0);
    }
}
