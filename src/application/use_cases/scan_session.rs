//! 360°スキャンセッション
//!
//! ウィザードの状態機械とカメラストリーム、プレビューをまとめて所有する。
//! カメラとプレビューの解放は `release_resources` に集約し、
//! 完了・キャンセル・エラー・ドロップのいずれの経路でも必ず通る

use crate::domain::capture::{
    CameraDevice, CameraFacing, CameraStream, Capture, CaptureError, PreviewStore,
    SCAN_STEP_COUNT, ScanStep, ScanWizard,
};
use crate::domain::shared::{ImageBlob, PreviewHandle};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// スキャンの進捗
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanProgress {
    pub step_index: usize,
    pub total_steps: usize,
    pub step: Option<ScanStepInfo>,
    pub previews: Vec<PreviewHandle>,
    pub complete: bool,
    pub closed: bool,
    pub streaming: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanStepInfo {
    pub step: ScanStep,
    pub title: &'static str,
    pub instruction: &'static str,
}

impl From<ScanStep> for ScanStepInfo {
    fn from(step: ScanStep) -> Self {
        Self {
            step,
            title: step.title(),
            instruction: step.instruction(),
        }
    }
}

pub struct ScanSession {
    wizard: ScanWizard,
    stream: Option<Box<dyn CameraStream>>,
    previews: Arc<dyn PreviewStore>,
}

impl ScanSession {
    /// カメラストリームを取得してスキャンを開始
    pub fn start(
        camera: &dyn CameraDevice,
        previews: Arc<dyn PreviewStore>,
    ) -> Result<Self, CaptureError> {
        let stream = camera
            .open_stream(CameraFacing::Environment)
            .inspect_err(|e| warn!("スキャン用のカメラを取得できません: {}", e))?;
        info!(camera = camera.name(), "360°スキャンを開始");

        Ok(Self {
            wizard: ScanWizard::new(),
            stream: Some(stream),
            previews,
        })
    }

    pub fn progress(&self) -> ScanProgress {
        ScanProgress {
            step_index: self.wizard.step_index(),
            total_steps: SCAN_STEP_COUNT,
            step: self.wizard.current_step().map(ScanStepInfo::from),
            previews: self.wizard.captures().iter().map(|c| c.preview).collect(),
            complete: self.wizard.is_complete(),
            closed: self.wizard.is_closed(),
            streaming: self.stream.is_some(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.wizard.is_closed()
    }

    /// 現在のステップを撮影して次へ進む
    pub fn capture(&mut self) -> Result<ScanProgress, CaptureError> {
        if self.wizard.is_complete() {
            return Err(CaptureError::ScanComplete);
        }
        let stream = self.stream.as_mut().ok_or(CaptureError::ScanClosed)?;

        let frame = stream.grab_frame()?;
        let preview = self.previews.register(&frame);
        let step = self.wizard.capture(Capture::new(frame, preview)).inspect_err(|_| {
            self.previews.release(&preview);
        })?;

        info!(step = %step, "スキャン画像を撮影しました");
        Ok(self.progress())
    }

    /// 4枚揃ったスキャンを完了し、画像を返す
    ///
    /// カメラとプレビューはすべて解放される
    pub fn finish(&mut self) -> Result<Vec<ImageBlob>, CaptureError> {
        let captures = self.wizard.finish()?;
        let images = self.release_resources(captures);
        info!(image_count = images.len(), "360°スキャンを完了しました");
        Ok(images)
    }

    /// スキャンを中止する。いつでも呼び出せる
    pub fn cancel(&mut self) {
        let captures = self.wizard.cancel();
        let discarded = self.release_resources(captures).len();
        info!(discarded, "360°スキャンを中止しました");
    }

    fn release_resources(&mut self, captures: Vec<Capture>) -> Vec<ImageBlob> {
        if self.stream.take().is_some() {
            debug!("カメラストリームを解放");
        }
        captures
            .into_iter()
            .map(|capture| {
                self.previews.release(&capture.preview);
                capture.image
            })
            .collect()
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        if !self.wizard.is_closed() || self.stream.is_some() {
            self.cancel();
        }
    }
}
