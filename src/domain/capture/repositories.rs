use super::errors::CaptureError;
use super::value_objects::CameraFacing;
use crate::domain::shared::value_objects::{ImageBlob, PreviewHandle};

/// カメラデバイスのトレイト
///
/// 同時に開けるストリームは1つだけ
pub trait CameraDevice: Send + Sync {
    /// ストリームを取得。取得できない場合は `CameraUnavailable`
    fn open_stream(&self, facing: CameraFacing) -> Result<Box<dyn CameraStream>, CaptureError>;

    fn name(&self) -> &str;
}

/// 開いているカメラストリーム
///
/// ドロップ時にカメラを解放する
pub trait CameraStream: Send {
    /// 現在のフレームを1枚取得
    fn grab_frame(&mut self) -> Result<ImageBlob, CaptureError>;
}

/// プレビューリソースの管理
pub trait PreviewStore: Send + Sync {
    fn register(&self, image: &ImageBlob) -> PreviewHandle;

    fn get(&self, handle: &PreviewHandle) -> Option<ImageBlob>;

    /// 解放済みまたは未登録の場合は `false`
    fn release(&self, handle: &PreviewHandle) -> bool;

    fn active_count(&self) -> usize;

    fn release_all(&self, handles: &[PreviewHandle]) -> usize {
        handles.iter().filter(|handle| self.release(handle)).count()
    }
}
