//! Error types shared by the adapters

use thiserror::Error;

/// Adapter errors
///
/// 呼び出し側 (Session) ではすべて「外部呼び出し失敗」として扱われ、
/// ログに記録された上で空リスト / Failed ステータスに縮退します。
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
