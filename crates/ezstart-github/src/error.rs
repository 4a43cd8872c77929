//! GitHub client error types

use ezstart_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GithubError {
    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid repository public key: {0}")]
    InvalidPublicKey(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl GithubError {
    /// Build an error from a non-success response, using the `message`
    /// field of GitHub's error body when present.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message")?.as_str().map(str::to_string))
            .unwrap_or_else(|| {
                if body.is_empty() {
                    "no response body".to_string()
                } else {
                    body.to_string()
                }
            });
        GithubError::Api { status, message }
    }
}

impl From<GithubError> for CoreError {
    fn from(e: GithubError) -> Self {
        match e {
            GithubError::Api { status: 401, .. } => CoreError::AuthenticationFailed(e.to_string()),
            GithubError::InvalidPublicKey(_) | GithubError::Encryption(_) => {
                CoreError::Encryption(e.to_string())
            }
            GithubError::InvalidConfig(message) => CoreError::InvalidConfig(message),
            other => CoreError::ApiError(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, GithubError>;
