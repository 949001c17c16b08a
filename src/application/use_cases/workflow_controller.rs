//! ワークフローコントローラー
//!
//! セッション状態を保持し、ユーザー操作に応じてリモートデザインサービスの呼び出しを順序付ける。
//! ロックはリモート呼び出しの前に解放し、完了時に再取得して結果を反映する。
//! 実行中フラグにより同時に走るリモート呼び出しは常に1つ

use crate::domain::capture::PreviewStore;
use crate::domain::design::{
    DesignResult, DesignService, PendingOperation, ProductType, Session, SessionSnapshot,
    WorkflowError,
};
use crate::domain::shared::ImageBlob;
use crate::measure_time;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

pub struct WorkflowController {
    service: Arc<dyn DesignService>,
    previews: Arc<dyn PreviewStore>,
    session: Mutex<Session>,
}

impl WorkflowController {
    pub fn new(service: Arc<dyn DesignService>, previews: Arc<dyn PreviewStore>) -> Self {
        Self {
            service,
            previews,
            session: Mutex::new(Session::new()),
        }
    }

    pub fn previews(&self) -> &Arc<dyn PreviewStore> {
        &self.previews
    }

    pub fn provider_name(&self) -> &str {
        self.service.provider_name()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }

    pub async fn result(&self) -> Option<DesignResult> {
        self.session.lock().await.result().cloned()
    }

    /// 画像を選択する（暗黙のリセット）
    pub async fn select_images(
        &self,
        images: Vec<ImageBlob>,
    ) -> Result<SessionSnapshot, WorkflowError> {
        if images.is_empty() {
            return Err(WorkflowError::NoImages);
        }

        let previews = images
            .iter()
            .map(|image| self.previews.register(image))
            .collect();

        let mut session = self.session.lock().await;
        let superseded = session.replace_images(images, previews)?;
        let released = self.previews.release_all(&superseded);
        info!(
            image_count = session.images().len(),
            released_previews = released,
            "画像を選択しました"
        );
        Ok(session.snapshot())
    }

    /// デザインの説明を取得
    pub async fn request_description(
        &self,
        product: ProductType,
    ) -> Result<SessionSnapshot, WorkflowError> {
        let (ticket, images) = {
            let mut session = self.session.lock().await;
            let ticket = session
                .begin(PendingOperation::Describing)
                .inspect_err(|e| warn!("説明取得を拒否: {}", e))?;
            (ticket, session.images().to_vec())
        };

        info!(image_count = images.len(), %product, "デザインの説明を取得中");
        let outcome = measure_time!("describe", {
            self.service.describe(&images, product).await
        });

        let mut session = self.session.lock().await;
        match session.complete_description(ticket, outcome) {
            Ok(_) => Ok(session.snapshot()),
            Err(e) => {
                warn!("説明取得に失敗: {}", e);
                Err(e.into())
            }
        }
    }

    /// 説明からデザインを再生成
    pub async fn request_recreate(&self) -> Result<SessionSnapshot, WorkflowError> {
        let (ticket, description) = {
            let mut session = self.session.lock().await;
            let ticket = session
                .begin(PendingOperation::Recreating)
                .inspect_err(|e| warn!("再生成を拒否: {}", e))?;
            (ticket, session.description().unwrap_or_default().to_string())
        };

        info!("デザインを再生成中");
        let outcome = measure_time!("recreate", {
            self.service.recreate(&description).await
        });

        let mut session = self.session.lock().await;
        match session.complete_result(ticket, outcome.map(DesignResult::recreated)) {
            Ok(_) => Ok(session.snapshot()),
            Err(e) => {
                warn!("再生成に失敗: {}", e);
                Err(e.into())
            }
        }
    }

    /// 元のデザインを透過背景で抽出
    pub async fn request_extract_original(
        &self,
        product: ProductType,
    ) -> Result<SessionSnapshot, WorkflowError> {
        let (ticket, images) = {
            let mut session = self.session.lock().await;
            let ticket = session
                .begin(PendingOperation::Extracting)
                .inspect_err(|e| warn!("抽出を拒否: {}", e))?;
            (ticket, session.images().to_vec())
        };

        info!(image_count = images.len(), %product, "元のデザインを抽出中");
        let outcome = measure_time!("extract_original", {
            self.service.extract_original(&images, product).await
        });

        let mut session = self.session.lock().await;
        match session.complete_result(ticket, outcome.map(DesignResult::extracted)) {
            Ok(_) => Ok(session.snapshot()),
            Err(e) => {
                warn!("抽出に失敗: {}", e);
                Err(e.into())
            }
        }
    }

    /// セッションを空に戻し、すべてのプレビューを解放
    ///
    /// 実行中のリモート呼び出しは待たない。遅れて届いた結果は破棄される
    pub async fn reset(&self) -> SessionSnapshot {
        let mut session = self.session.lock().await;
        let previews = session.clear();
        let released = self.previews.release_all(&previews);
        info!(released_previews = released, "セッションをリセットしました");
        session.snapshot()
    }
}
