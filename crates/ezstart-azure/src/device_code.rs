//! Device code sign-in
//!
//! For terminals without a usable browser (SSH sessions, containers).
//! The user code and verification URL are written to stderr, then the
//! token endpoint is polled until the user finishes or the code expires.

use crate::credential::{AccessToken, TokenCache, TokenCredential, token_from_response, token_url};
use crate::error::{AzureError, Result};
use crate::types::{AUTHORITY_BASE, TokenErrorResponse, TokenResponse};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Extra delay requested by `slow_down`
const SLOW_DOWN_SECS: u64 = 5;

/// Response of the `devicecode` endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceCodeInfo {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
    #[serde(default = "default_interval")]
    pub interval: u64,
    #[serde(default)]
    pub message: String,
}

fn default_expires_in() -> u64 {
    900
}

fn default_interval() -> u64 {
    5
}

impl DeviceCodeInfo {
    /// Text shown to the user
    pub fn prompt(&self) -> String {
        if self.message.is_empty() {
            format!(
                "To sign in, open {} and enter the code {}",
                self.verification_uri, self.user_code
            )
        } else {
            self.message.clone()
        }
    }
}

/// Outcome of one poll of the token endpoint
#[derive(Debug, PartialEq, Eq)]
enum PollOutcome {
    Pending,
    SlowDown,
    Expired,
    Failed(String),
}

fn classify(error: &TokenErrorResponse) -> PollOutcome {
    match error.error.as_str() {
        "authorization_pending" => PollOutcome::Pending,
        "slow_down" => PollOutcome::SlowDown,
        "expired_token" | "code_expired" => PollOutcome::Expired,
        "access_denied" | "authorization_declined" => {
            PollOutcome::Failed("sign-in was declined".to_string())
        }
        other => PollOutcome::Failed(format!(
            "{} {}",
            other,
            error.error_description.clone().unwrap_or_default()
        )
        .trim()
        .to_string()),
    }
}

/// Device code credential
pub struct DeviceCodeCredential {
    http: reqwest::Client,
    client_id: String,
    tenant_id: String,
    open_browser: bool,
    cache: TokenCache,
}

impl DeviceCodeCredential {
    pub fn new(client_id: impl Into<String>, tenant_id: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id: client_id.into(),
            tenant_id: tenant_id.into(),
            open_browser: false,
            cache: TokenCache::default(),
        }
    }

    /// Also try to open the verification URL in a browser
    pub fn with_browser(mut self, open_browser: bool) -> Self {
        self.open_browser = open_browser;
        self
    }

    fn device_code_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/devicecode",
            AUTHORITY_BASE, self.tenant_id
        )
    }

    async fn start(&self, scope: &str) -> Result<DeviceCodeInfo> {
        let scopes = format!("{} offline_access", scope);
        let params = [
            ("client_id", self.client_id.as_str()),
            ("scope", scopes.as_str()),
        ];

        let response = self
            .http
            .post(self.device_code_url())
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let error: TokenErrorResponse = serde_json::from_str(&body).unwrap_or_default();
            return Err(AzureError::AuthenticationFailed(format!(
                "device code request failed: {} {}",
                error.error,
                error.error_description.unwrap_or_default()
            )));
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn poll(&self, info: &DeviceCodeInfo) -> Result<AccessToken> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("grant_type", DEVICE_CODE_GRANT),
            ("device_code", info.device_code.as_str()),
        ];
        let deadline = tokio::time::Instant::now() + Duration::from_secs(info.expires_in);
        let mut interval = info.interval.max(1);

        loop {
            tokio::time::sleep(Duration::from_secs(interval)).await;
            if tokio::time::Instant::now() >= deadline {
                return Err(AzureError::DeviceCodeExpired);
            }

            let response = self
                .http
                .post(token_url(&self.tenant_id))
                .form(&params)
                .send()
                .await?;

            let status = response.status();
            let body = response.text().await?;
            if status.is_success() {
                let token: TokenResponse = serde_json::from_str(&body)?;
                return Ok(token_from_response(token));
            }

            let error: TokenErrorResponse = serde_json::from_str(&body).unwrap_or_default();
            match classify(&error) {
                PollOutcome::Pending => {}
                PollOutcome::SlowDown => {
                    interval += SLOW_DOWN_SECS;
                    tracing::debug!("Device code polling slowed to {}s", interval);
                }
                PollOutcome::Expired => return Err(AzureError::DeviceCodeExpired),
                PollOutcome::Failed(reason) => {
                    return Err(AzureError::AuthenticationFailed(reason));
                }
            }
        }
    }

    async fn acquire(&self, scope: &str) -> Result<AccessToken> {
        let info = self.start(scope).await?;

        eprintln!("{}", info.prompt());
        if self.open_browser
            && let Err(e) = open::that(&info.verification_uri)
        {
            tracing::debug!("Could not open a browser: {}", e);
        }

        let token = self.poll(&info).await?;
        tracing::info!("Azure sign-in completed");
        Ok(token)
    }
}

#[async_trait]
impl TokenCredential for DeviceCodeCredential {
    async fn get_token(&self, scope: &str) -> Result<AccessToken> {
        self.cache
            .get_or_acquire(scope, || self.acquire(scope))
            .await
    }
}
