//! Azure provider error types

use ezstart_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AzureError {
    #[error("Azure CLI not found. Please install: https://aka.ms/installazurecli")]
    AzureCliNotFound,

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Device code expired before sign-in completed")]
    DeviceCodeExpired,

    #[error("ARM API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("ARM pagination loop: nextLink {0} was already fetched")]
    PaginationLoop(String),

    #[error("az command failed: {0}")]
    CommandFailed(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AzureError {
    /// Build an error from a non-success ARM response, extracting
    /// `error.message` when the body follows the ARM error envelope.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                let error = v.get("error")?;
                let code = error.get("code").and_then(|c| c.as_str()).unwrap_or("Unknown");
                let message = error.get("message").and_then(|m| m.as_str())?;
                Some(format!("{}: {}", code, message))
            })
            .unwrap_or_else(|| {
                if body.is_empty() {
                    "no response body".to_string()
                } else {
                    body.to_string()
                }
            });

        AzureError::Api { status, message }
    }
}

impl From<AzureError> for CoreError {
    fn from(e: AzureError) -> Self {
        match e {
            AzureError::AuthenticationFailed(_)
            | AzureError::DeviceCodeExpired
            | AzureError::AzureCliNotFound => CoreError::AuthenticationFailed(e.to_string()),
            AzureError::Api { status: 401, .. } => CoreError::AuthenticationFailed(e.to_string()),
            AzureError::InvalidConfig(message) => CoreError::InvalidConfig(message),
            AzureError::CommandFailed(message) => CoreError::CommandFailed(message),
            other => CoreError::ApiError(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AzureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_arm_envelope() {
        let body = r#"{"error":{"code":"AuthorizationFailed","message":"no access"}}"#;
        let err = AzureError::from_status(403, body);
        assert_eq!(
            err.to_string(),
            "ARM API error (403): AuthorizationFailed: no access"
        );
    }

    #[test]
    fn test_from_status_plain_body() {
        let err = AzureError::from_status(502, "Bad Gateway");
        assert_eq!(err.to_string(), "ARM API error (502): Bad Gateway");

        let err = AzureError::from_status(500, "");
        assert_eq!(err.to_string(), "ARM API error (500): no response body");
    }

    #[test]
    fn test_into_core_error() {
        let core: CoreError = AzureError::from_status(401, "").into();
        assert!(matches!(core, CoreError::AuthenticationFailed(_)));

        let core: CoreError = AzureError::from_status(404, "").into();
        assert!(matches!(core, CoreError::ApiError(_)));
    }
}
