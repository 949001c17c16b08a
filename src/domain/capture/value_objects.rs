use serde::{Deserialize, Serialize};
use std::fmt;

/// 360°スキャンのステップ数
pub const SCAN_STEP_COUNT: usize = 4;

/// 360°スキャンの撮影角度
///
/// 正面 → 右 → 背面 → 左 の固定順序で進む
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStep {
    Front,
    Right,
    Back,
    Left,
}

impl ScanStep {
    pub const ALL: [ScanStep; SCAN_STEP_COUNT] =
        [ScanStep::Front, ScanStep::Right, ScanStep::Back, ScanStep::Left];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(&self) -> usize {
        match self {
            ScanStep::Front => 0,
            ScanStep::Right => 1,
            ScanStep::Back => 2,
            ScanStep::Left => 3,
        }
    }

    /// 次のステップ。最後のステップの後は `None`
    pub fn next(&self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn title(&self) -> &'static str {
        match self {
            ScanStep::Front => "Front View",
            ScanStep::Right => "Right View",
            ScanStep::Back => "Back View",
            ScanStep::Left => "Left View",
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            ScanStep::Front => "Center the front of the item in the frame.",
            ScanStep::Right => "Slowly rotate the item to the right.",
            ScanStep::Back => "Continue rotating to show the back.",
            ScanStep::Left => "Finish by showing the left side.",
        }
    }
}

impl fmt::Display for ScanStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// カメラの向き
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraFacing {
    /// 背面カメラ
    #[default]
    Environment,
    /// 前面カメラ
    User,
}
