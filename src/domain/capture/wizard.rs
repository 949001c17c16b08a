//! 360°スキャンウィザード
//!
//! 4ステップ固定の有限状態機械。スキップや順序変更はできない
//!
//! ```text
//! Capturing(Front) -> Capturing(Right) -> Capturing(Back) -> Capturing(Left) -> Complete
//!        \___________________ cancel() / finish() ___________________________/ -> Closed
//! ```

use super::entities::Capture;
use super::errors::CaptureError;
use super::value_objects::{SCAN_STEP_COUNT, ScanStep};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanWizard {
    /// `step` の撮影待ち。`captures.len() == step.index()`
    Capturing {
        step: ScanStep,
        captures: Vec<Capture>,
    },
    /// 4枚すべて撮影済み
    Complete { captures: Vec<Capture> },
    /// 完了またはキャンセル済み
    Closed,
}

impl Default for ScanWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanWizard {
    pub fn new() -> Self {
        Self::Capturing {
            step: ScanStep::Front,
            captures: Vec::with_capacity(SCAN_STEP_COUNT),
        }
    }

    /// 撮影待ちのステップ
    pub fn current_step(&self) -> Option<ScanStep> {
        match self {
            Self::Capturing { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// 現在のステップ番号（0..=4）
    pub fn step_index(&self) -> usize {
        self.captures().len()
    }

    pub fn captures(&self) -> &[Capture] {
        match self {
            Self::Capturing { captures, .. } | Self::Complete { captures } => captures,
            Self::Closed => &[],
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// 現在のステップに撮影画像を追加して次へ進む
    ///
    /// 記録したステップを返す
    pub fn capture(&mut self, capture: Capture) -> Result<ScanStep, CaptureError> {
        let (step, mut captures) = match std::mem::replace(self, Self::Closed) {
            Self::Capturing { step, captures } => (step, captures),
            complete @ Self::Complete { .. } => {
                *self = complete;
                return Err(CaptureError::ScanComplete);
            }
            Self::Closed => return Err(CaptureError::ScanClosed),
        };

        captures.push(capture);
        debug!(step = %step, captured = captures.len(), "スキャン画像を記録");

        *self = match step.next() {
            Some(next) => Self::Capturing {
                step: next,
                captures,
            },
            None => Self::Complete { captures },
        };
        Ok(step)
    }

    /// 完了したスキャンの撮影画像を取り出す
    ///
    /// 4枚揃っていない場合は状態を変えずにエラーを返す
    pub fn finish(&mut self) -> Result<Vec<Capture>, CaptureError> {
        match std::mem::replace(self, Self::Closed) {
            Self::Complete { captures } => Ok(captures),
            incomplete @ Self::Capturing { .. } => {
                let error = CaptureError::ScanIncomplete {
                    captured: incomplete.step_index(),
                    required: SCAN_STEP_COUNT,
                };
                *self = incomplete;
                Err(error)
            }
            Self::Closed => Err(CaptureError::ScanClosed),
        }
    }

    /// スキャンを中止し、破棄する撮影画像を返す
    pub fn cancel(&mut self) -> Vec<Capture> {
        match std::mem::replace(self, Self::Closed) {
            Self::Capturing { captures, .. } | Self::Complete { captures } => captures,
            Self::Closed => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::value_objects::{ImageBlob, PreviewHandle};

    fn capture(n: u8) -> Capture {
        Capture::new(ImageBlob::jpeg(vec![n]), PreviewHandle::generate())
    }

    fn completed_wizard() -> ScanWizard {
        let mut wizard = ScanWizard::new();
        for n in 0..4 {
            wizard.capture(capture(n)).unwrap();
        }
        wizard
    }

    #[test]
    fn test_steps_advance_in_order() {
        let mut wizard = ScanWizard::new();
        assert_eq!(wizard.current_step(), Some(ScanStep::Front));

        let recorded: Vec<ScanStep> = (0..4).map(|n| wizard.capture(capture(n)).unwrap()).collect();
        assert_eq!(recorded, ScanStep::ALL.to_vec());
        assert!(wizard.is_complete());
        assert_eq!(wizard.step_index(), 4);
        assert_eq!(wizard.current_step(), None);
    }

    #[test]
    fn test_fifth_capture_is_rejected() {
        let mut wizard = completed_wizard();
        assert_eq!(wizard.capture(capture(5)), Err(CaptureError::ScanComplete));
        assert_eq!(wizard.captures().len(), 4);
        assert!(wizard.is_complete());
    }

    #[test]
    fn test_finish_requires_four_captures() {
        let mut wizard = ScanWizard::new();
        for n in 0..3 {
            wizard.capture(capture(n)).unwrap();
            assert_eq!(
                wizard.finish(),
                Err(CaptureError::ScanIncomplete {
                    captured: n as usize + 1,
                    required: 4
                })
            );
        }
        assert_eq!(wizard.current_step(), Some(ScanStep::Left));
    }

    #[test]
    fn test_finish_hands_over_captures_in_order() {
        let mut wizard = completed_wizard();
        let captures = wizard.finish().unwrap();
        let bytes: Vec<u8> = captures.iter().map(|c| c.image.data()[0]).collect();
        assert_eq!(bytes, vec![0, 1, 2, 3]);
        assert!(wizard.is_closed());
        assert_eq!(wizard.finish(), Err(CaptureError::ScanClosed));
    }

    #[test]
    fn test_cancel_discards_captures() {
        let mut wizard = ScanWizard::new();
        wizard.capture(capture(0)).unwrap();
        wizard.capture(capture(1)).unwrap();
        let discarded = wizard.cancel();
        assert_eq!(discarded.len(), 2);
        assert!(wizard.is_closed());
        assert_eq!(wizard.capture(capture(2)), Err(CaptureError::ScanClosed));
        assert!(wizard.cancel().is_empty());
    }
}
