use crate::domain::design::{DesignError, DesignOperation, DesignService, ProductType};
use crate::domain::shared::ImageBlob;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tracing::debug;

/// 呼び出し回数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MockCallCounts {
    pub describe: usize,
    pub recreate: usize,
    pub extract: usize,
}

impl MockCallCounts {
    pub fn total(&self) -> usize {
        self.describe + self.recreate + self.extract
    }
}

/// ネットワークを使わないデザインサービス
///
/// 応答を差し替えられ、`with_gate` を使うと通知されるまで応答を保留する
pub struct MockDesignService {
    description: Result<String, String>,
    recreated: Result<ImageBlob, String>,
    extracted: Result<ImageBlob, String>,
    gate: Option<Arc<Notify>>,
    describe_calls: AtomicUsize,
    recreate_calls: AtomicUsize,
    extract_calls: AtomicUsize,
    last_recreate_description: Mutex<Option<String>>,
    last_product: Mutex<Option<ProductType>>,
}

impl Default for MockDesignService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDesignService {
    pub fn new() -> Self {
        Self {
            description: Ok("Mock design description".to_string()),
            recreated: Ok(ImageBlob::jpeg(b"mock-jpeg".to_vec())),
            extracted: Ok(ImageBlob::png(b"mock-png".to_vec())),
            gate: None,
            describe_calls: AtomicUsize::new(0),
            recreate_calls: AtomicUsize::new(0),
            extract_calls: AtomicUsize::new(0),
            last_recreate_description: Mutex::new(None),
            last_product: Mutex::new(None),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Ok(description.into());
        self
    }

    pub fn with_recreated(mut self, data: Vec<u8>) -> Self {
        self.recreated = Ok(ImageBlob::jpeg(data));
        self
    }

    pub fn with_extracted(mut self, data: Vec<u8>) -> Self {
        self.extracted = Ok(ImageBlob::png(data));
        self
    }

    pub fn with_describe_failure(mut self, message: impl Into<String>) -> Self {
        self.description = Err(message.into());
        self
    }

    pub fn with_recreate_failure(mut self, message: impl Into<String>) -> Self {
        self.recreated = Err(message.into());
        self
    }

    pub fn with_extract_failure(mut self, message: impl Into<String>) -> Self {
        self.extracted = Err(message.into());
        self
    }

    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> MockCallCounts {
        MockCallCounts {
            describe: self.describe_calls.load(Ordering::SeqCst),
            recreate: self.recreate_calls.load(Ordering::SeqCst),
            extract: self.extract_calls.load(Ordering::SeqCst),
        }
    }

    pub fn last_recreate_description(&self) -> Option<String> {
        self.last_recreate_description
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn last_product(&self) -> Option<ProductType> {
        *self.last_product.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record_product(&self, product: ProductType) {
        *self.last_product.lock().unwrap_or_else(|e| e.into_inner()) = Some(product);
    }

    async fn wait_for_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

fn respond<T: Clone>(
    operation: DesignOperation,
    configured: &Result<T, String>,
) -> Result<T, DesignError> {
    configured
        .clone()
        .map_err(|message| DesignError::remote(operation, message))
}

#[async_trait]
impl DesignService for MockDesignService {
    async fn describe(
        &self,
        images: &[ImageBlob],
        product: ProductType,
    ) -> Result<String, DesignError> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        self.record_product(product);
        debug!(image_count = images.len(), %product, "Mock describe");
        self.wait_for_gate().await;
        respond(DesignOperation::Describe, &self.description)
    }

    async fn recreate(&self, description: &str) -> Result<ImageBlob, DesignError> {
        self.recreate_calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_recreate_description
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(description.to_string());
        debug!("Mock recreate");
        self.wait_for_gate().await;
        respond(DesignOperation::Recreate, &self.recreated)
    }

    async fn extract_original(
        &self,
        images: &[ImageBlob],
        product: ProductType,
    ) -> Result<ImageBlob, DesignError> {
        self.extract_calls.fetch_add(1, Ordering::SeqCst);
        self.record_product(product);
        debug!(image_count = images.len(), %product, "Mock extract");
        self.wait_for_gate().await;
        respond(DesignOperation::Extract, &self.extracted)
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}
