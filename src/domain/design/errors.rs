use super::value_objects::{DesignOperation, PendingOperation, WorkflowState};
use thiserror::Error;

/// リモートデザインサービスのエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DesignError {
    #[error("Remote {operation} call failed: {message}")]
    RemoteCall {
        operation: DesignOperation,
        message: String,
    },

    #[error("Remote {operation} call returned no usable result")]
    EmptyResult { operation: DesignOperation },
}

impl DesignError {
    pub fn remote(operation: DesignOperation, message: impl Into<String>) -> Self {
        Self::RemoteCall {
            operation,
            message: message.into(),
        }
    }

    pub fn operation(&self) -> DesignOperation {
        match self {
            Self::RemoteCall { operation, .. } | Self::EmptyResult { operation } => *operation,
        }
    }

    /// 画面に表示するメッセージ
    ///
    /// リモート呼び出しの失敗はプロバイダーのメッセージをそのまま使う
    pub fn user_message(&self) -> String {
        match self {
            Self::RemoteCall { message, .. } => message.clone(),
            Self::EmptyResult { .. } => self.to_string(),
        }
    }
}

/// ワークフロー操作のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("No images selected")]
    NoImages,

    #[error("Cannot start {operation} while session is {state}")]
    InvalidTransition {
        operation: PendingOperation,
        state: WorkflowState,
    },

    #[error("Another operation is already in progress: {0}")]
    Busy(PendingOperation),

    #[error(transparent)]
    Remote(#[from] DesignError),
}

impl WorkflowError {
    /// リモート呼び出しを行わずに拒否されたかチェック
    pub fn is_rejection(&self) -> bool {
        !matches!(self, WorkflowError::Remote(_))
    }
}

/// 結果画像の保存エラー
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No result available to download")]
    NoResult,

    #[error("Failed to save {filename}: {source}")]
    Write {
        filename: String,
        #[source]
        source: std::io::Error,
    },
}
