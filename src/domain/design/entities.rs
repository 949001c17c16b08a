//! デザイン集約のエンティティ
//!
//! ワークフローのセッション状態と結果画像を定義

use super::errors::{DesignError, WorkflowError};
use super::value_objects::{DesignOperation, PendingOperation, ResultEncoding, WorkflowState};
use crate::domain::shared::value_objects::{ImageBlob, PreviewHandle};
use serde::Serialize;
use tracing::debug;

/// ダウンロードファイル名のベース
pub const DOWNLOAD_BASENAME: &str = "brand-extractor-design";

/// 生成・抽出された結果画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignResult {
    pub image: ImageBlob,
    pub encoding: ResultEncoding,
}

impl DesignResult {
    pub fn new(image: ImageBlob, encoding: ResultEncoding) -> Self {
        Self { image, encoding }
    }

    /// 再生成結果（JPEG）
    pub fn recreated(image: ImageBlob) -> Self {
        Self::new(image, ResultEncoding::Jpeg)
    }

    /// 抽出結果（透過PNG）
    pub fn extracted(image: ImageBlob) -> Self {
        Self::new(image, ResultEncoding::Png)
    }

    pub fn mime_type(&self) -> &'static str {
        self.encoding.mime_type()
    }

    /// エンコーディングに応じた拡張子付きのファイル名
    pub fn download_filename(&self) -> String {
        format!("{DOWNLOAD_BASENAME}.{}", self.encoding.extension())
    }
}

/// 開始済みリモート操作のチケット
///
/// 完了時にセッションの世代と照合し、リセット後の古い結果を破棄するために使う
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationTicket {
    epoch: u64,
    operation: PendingOperation,
}

impl OperationTicket {
    pub fn operation(&self) -> PendingOperation {
        self.operation
    }
}

/// ワークフローのセッション
///
/// 不変条件:
/// - `result` は `description` が空でない場合のみ設定される
/// - `description` は `images` が空でない場合のみ設定される
/// - 実行中の操作は高々1つ
#[derive(Debug, Clone, Default)]
pub struct Session {
    epoch: u64,
    images: Vec<ImageBlob>,
    previews: Vec<PreviewHandle>,
    description: Option<String>,
    result: Option<DesignResult>,
    pending: PendingOperation,
    last_error: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// 現在の状態を導出
    pub fn state(&self) -> WorkflowState {
        match self.pending {
            PendingOperation::Describing => WorkflowState::DescriptionPending,
            PendingOperation::Recreating | PendingOperation::Extracting => {
                WorkflowState::ResultPending
            }
            PendingOperation::None => {
                if self.result.is_some() {
                    WorkflowState::ResultReady
                } else if self.description.is_some() {
                    WorkflowState::DescriptionReady
                } else {
                    WorkflowState::Empty
                }
            }
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn images(&self) -> &[ImageBlob] {
        &self.images
    }

    pub fn previews(&self) -> &[PreviewHandle] {
        &self.previews
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn result(&self) -> Option<&DesignResult> {
        self.result.as_ref()
    }

    pub fn pending(&self) -> PendingOperation {
        self.pending
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }

    /// 画像を差し替える（暗黙のリセット）
    ///
    /// 置き換えられたプレビューハンドルを返す。呼び出し側で解放すること
    pub fn replace_images(
        &mut self,
        images: Vec<ImageBlob>,
        previews: Vec<PreviewHandle>,
    ) -> Result<Vec<PreviewHandle>, WorkflowError> {
        if images.is_empty() {
            return Err(WorkflowError::NoImages);
        }
        let superseded = self.clear();
        self.images = images;
        self.previews = previews;
        Ok(superseded)
    }

    /// セッションを空に戻す
    ///
    /// 保持していたプレビューハンドルを返す。呼び出し側で解放すること
    pub fn clear(&mut self) -> Vec<PreviewHandle> {
        let previews = std::mem::take(&mut self.previews);
        *self = Session {
            epoch: self.epoch + 1,
            ..Session::default()
        };
        previews
    }

    /// リモート操作を開始する
    pub fn begin(&mut self, operation: PendingOperation) -> Result<OperationTicket, WorkflowError> {
        if self.pending.is_active() {
            return Err(WorkflowError::Busy(self.pending));
        }

        let state = self.state();
        let allowed = match operation {
            PendingOperation::Describing => {
                if state == WorkflowState::Empty && !self.has_images() {
                    return Err(WorkflowError::NoImages);
                }
                state == WorkflowState::Empty
            }
            PendingOperation::Recreating | PendingOperation::Extracting => {
                state == WorkflowState::DescriptionReady
            }
            PendingOperation::None => false,
        };

        if !allowed {
            return Err(WorkflowError::InvalidTransition { operation, state });
        }

        self.last_error = None;
        self.pending = operation;
        debug!(epoch = self.epoch, %operation, "リモート操作を開始");

        Ok(OperationTicket {
            epoch: self.epoch,
            operation,
        })
    }

    fn is_current(&self, ticket: &OperationTicket) -> bool {
        ticket.epoch == self.epoch && ticket.operation == self.pending
    }

    /// 説明取得の完了を反映する
    ///
    /// `Ok(false)` はセッションがリセット済みで結果を破棄したことを示す
    pub fn complete_description(
        &mut self,
        ticket: OperationTicket,
        outcome: Result<String, DesignError>,
    ) -> Result<bool, DesignError> {
        if ticket.operation != PendingOperation::Describing || !self.is_current(&ticket) {
            debug!(epoch = ticket.epoch, "古い説明取得結果を破棄");
            return Ok(false);
        }
        self.pending = PendingOperation::None;

        let outcome = outcome.and_then(|text| {
            if text.trim().is_empty() {
                Err(DesignError::EmptyResult {
                    operation: DesignOperation::Describe,
                })
            } else {
                Ok(text)
            }
        });

        match outcome {
            Ok(text) => {
                self.description = Some(text);
                Ok(true)
            }
            Err(e) => {
                self.last_error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// 再生成・抽出の完了を反映する
    pub fn complete_result(
        &mut self,
        ticket: OperationTicket,
        outcome: Result<DesignResult, DesignError>,
    ) -> Result<bool, DesignError> {
        let operation = match ticket.operation {
            PendingOperation::Recreating => DesignOperation::Recreate,
            PendingOperation::Extracting => DesignOperation::Extract,
            _ => return Ok(false),
        };
        if !self.is_current(&ticket) {
            debug!(epoch = ticket.epoch, "古い結果画像を破棄");
            return Ok(false);
        }
        self.pending = PendingOperation::None;

        let outcome = outcome.and_then(|result| {
            if result.image.is_empty() {
                Err(DesignError::EmptyResult { operation })
            } else {
                Ok(result)
            }
        });

        match outcome {
            Ok(result) => {
                self.result = Some(result);
                Ok(true)
            }
            Err(e) => {
                self.last_error = Some(e.user_message());
                Err(e)
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state(),
            image_count: self.images.len(),
            previews: self.previews.clone(),
            description: self.description.clone(),
            result: self.result.as_ref().map(|result| ResultSummary {
                encoding: result.encoding,
                mime_type: result.mime_type().to_string(),
                download_filename: result.download_filename(),
                size_bytes: result.image.len(),
            }),
            pending: self.pending,
            loading_text: self.pending.loading_text().map(str::to_string),
            error: self.last_error.clone(),
        }
    }
}

/// 結果画像の概要
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub encoding: ResultEncoding,
    pub mime_type: String,
    pub download_filename: String,
    pub size_bytes: usize,
}

/// セッションの読み取り専用ビュー
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub state: WorkflowState,
    pub image_count: usize,
    pub previews: Vec<PreviewHandle>,
    pub description: Option<String>,
    pub result: Option<ResultSummary>,
    pub pending: PendingOperation,
    pub loading_text: Option<String>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_images(count: usize) -> Session {
        let mut session = Session::new();
        let images = (0..count)
            .map(|i| ImageBlob::jpeg(vec![i as u8; 4]))
            .collect();
        let previews = (0..count).map(|_| PreviewHandle::generate()).collect();
        session.replace_images(images, previews).unwrap();
        session
    }

    fn describe(session: &mut Session, text: &str) {
        let ticket = session.begin(PendingOperation::Describing).unwrap();
        session
            .complete_description(ticket, Ok(text.to_string()))
            .unwrap();
    }

    #[test]
    fn test_state_progression() {
        let mut session = session_with_images(1);
        assert_eq!(session.state(), WorkflowState::Empty);

        let ticket = session.begin(PendingOperation::Describing).unwrap();
        assert_eq!(session.state(), WorkflowState::DescriptionPending);
        assert_eq!(
            session.complete_description(ticket, Ok("red logo".to_string())),
            Ok(true)
        );
        assert_eq!(session.state(), WorkflowState::DescriptionReady);

        let ticket = session.begin(PendingOperation::Extracting).unwrap();
        assert_eq!(session.state(), WorkflowState::ResultPending);
        let result = DesignResult::extracted(ImageBlob::png(vec![9u8; 8]));
        assert_eq!(session.complete_result(ticket, Ok(result)), Ok(true));
        assert_eq!(session.state(), WorkflowState::ResultReady);
        assert_eq!(session.result().unwrap().encoding, ResultEncoding::Png);
    }

    #[test]
    fn test_begin_rejects_invalid_transitions() {
        let mut session = Session::new();
        assert_eq!(
            session.begin(PendingOperation::Describing),
            Err(WorkflowError::NoImages)
        );
        assert_eq!(
            session.begin(PendingOperation::Recreating),
            Err(WorkflowError::InvalidTransition {
                operation: PendingOperation::Recreating,
                state: WorkflowState::Empty,
            })
        );

        let mut session = session_with_images(2);
        describe(&mut session, "logo");
        assert!(matches!(
            session.begin(PendingOperation::Describing),
            Err(WorkflowError::InvalidTransition { .. })
        ));
        assert!(matches!(
            session.begin(PendingOperation::None),
            Err(WorkflowError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_begin_rejects_while_pending() {
        let mut session = session_with_images(1);
        session.begin(PendingOperation::Describing).unwrap();
        assert_eq!(
            session.begin(PendingOperation::Describing),
            Err(WorkflowError::Busy(PendingOperation::Describing))
        );
    }

    #[test]
    fn test_description_failure_keeps_images() {
        let mut session = session_with_images(1);
        let ticket = session.begin(PendingOperation::Describing).unwrap();
        let error = DesignError::remote(DesignOperation::Describe, "quota exceeded");
        assert_eq!(session.complete_description(ticket, Err(error.clone())), Err(error));
        assert_eq!(session.state(), WorkflowState::Empty);
        assert_eq!(session.last_error(), Some("quota exceeded"));
        assert_eq!(session.images().len(), 1);
    }

    #[test]
    fn test_blank_description_is_failure() {
        let mut session = session_with_images(1);
        let ticket = session.begin(PendingOperation::Describing).unwrap();
        let outcome = session.complete_description(ticket, Ok("   ".to_string()));
        assert!(matches!(outcome, Err(DesignError::EmptyResult { .. })));
        assert_eq!(session.description(), None);
        assert!(session.last_error().is_some());
    }

    #[test]
    fn test_result_failure_returns_to_description_ready() {
        let mut session = session_with_images(1);
        describe(&mut session, "logo");
        let ticket = session.begin(PendingOperation::Recreating).unwrap();
        let outcome = session.complete_result(
            ticket,
            Ok(DesignResult::recreated(ImageBlob::jpeg(Vec::new()))),
        );
        assert!(matches!(outcome, Err(DesignError::EmptyResult { .. })));
        assert_eq!(session.state(), WorkflowState::DescriptionReady);
        assert_eq!(session.description(), Some("logo"));
    }

    #[test]
    fn test_error_cleared_on_next_action() {
        let mut session = session_with_images(1);
        let ticket = session.begin(PendingOperation::Describing).unwrap();
        let _ = session.complete_description(
            ticket,
            Err(DesignError::remote(DesignOperation::Describe, "boom")),
        );
        assert!(session.last_error().is_some());
        session.begin(PendingOperation::Describing).unwrap();
        assert_eq!(session.last_error(), None);
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut session = session_with_images(1);
        let ticket = session.begin(PendingOperation::Describing).unwrap();
        let released = session.clear();
        assert_eq!(released.len(), 1);
        assert_eq!(
            session.complete_description(ticket, Ok("late".to_string())),
            Ok(false)
        );
        assert_eq!(session.description(), None);
        assert!(!session.has_images());
        assert_eq!(session.state(), WorkflowState::Empty);
    }

    #[test]
    fn test_replace_images_returns_superseded_previews() {
        let mut session = session_with_images(2);
        describe(&mut session, "logo");
        let old = session.previews().to_vec();
        let superseded = session
            .replace_images(
                vec![ImageBlob::jpeg(vec![1u8])],
                vec![PreviewHandle::generate()],
            )
            .unwrap();
        assert_eq!(superseded, old);
        assert_eq!(session.description(), None);
        assert_eq!(session.images().len(), 1);
        assert_eq!(
            session.replace_images(Vec::new(), Vec::new()),
            Err(WorkflowError::NoImages)
        );
    }

    #[test]
    fn test_download_filename_matches_encoding() {
        let png = DesignResult::extracted(ImageBlob::png(vec![1u8]));
        assert_eq!(png.download_filename(), "brand-extractor-design.png");
        let jpeg = DesignResult::recreated(ImageBlob::jpeg(vec![1u8]));
        assert_eq!(jpeg.download_filename(), "brand-extractor-design.jpeg");
    }

    #[test]
    fn test_snapshot() {
        let mut session = session_with_images(2);
        session.begin(PendingOperation::Describing).unwrap();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.state, WorkflowState::DescriptionPending);
        assert_eq!(snapshot.image_count, 2);
        assert_eq!(snapshot.previews.len(), 2);
        assert_eq!(
            snapshot.loading_text.as_deref(),
            Some("AI is analyzing your image(s)...")
        );
    }
}
