//! Credentials for the Azure Resource Manager API

use crate::error::{AzureError, Result};
use crate::types::{AUTHORITY_BASE, TokenResponse};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Deserialize;
use std::process::Stdio;
use tokio::process::Command;
use tokio::sync::Mutex;

/// Scope for ARM management calls
pub const ARM_SCOPE: &str = "https://management.azure.com/.default";

/// Tokens are refreshed this long before they actually expire
const EXPIRY_SKEW_SECS: i64 = 120;

/// Bearer token with optional expiry
#[derive(Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub fn new(token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|at| Utc::now() + Duration::seconds(EXPIRY_SKEW_SECS) >= at)
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Source of bearer tokens
///
/// Implementations may suspend on user interaction (browser or device code sign-in).
#[async_trait]
pub trait TokenCredential: Send + Sync {
    async fn get_token(&self, scope: &str) -> Result<AccessToken>;
}

/// Token endpoint URL for a given tenant
pub(crate) fn token_url(tenant_id: &str) -> String {
    format!("{}/{}/oauth2/v2.0/token", AUTHORITY_BASE, tenant_id)
}

/// Convert the raw token endpoint response into an `AccessToken`
pub(crate) fn token_from_response(resp: TokenResponse) -> AccessToken {
    let expires_at = resp
        .expires_in
        .map(|secs| Utc::now() + Duration::seconds(secs as i64));
    AccessToken::new(resp.access_token, expires_at)
}

/// In-memory token cache shared by the interactive credentials.
///
/// The lock is held while a token is acquired so concurrent callers wait
/// for one sign-in instead of starting their own.
#[derive(Default)]
pub(crate) struct TokenCache {
    slot: Mutex<Option<(String, AccessToken)>>,
}

impl TokenCache {
    pub(crate) async fn get_or_acquire<F, Fut>(&self, scope: &str, acquire: F) -> Result<AccessToken>
    where
        F: FnOnce() -> Fut + Send,
        Fut: std::future::Future<Output = Result<AccessToken>> + Send,
    {
        let mut slot = self.slot.lock().await;
        if let Some((cached_scope, token)) = slot.as_ref()
            && cached_scope == scope
            && !token.is_expired()
        {
            return Ok(token.clone());
        }

        let token = acquire().await?;
        *slot = Some((scope.to_string(), token.clone()));
        Ok(token)
    }
}

/// Pre-obtained token (e.g., from `AZURE_ACCESS_TOKEN`)
pub struct StaticTokenCredential {
    token: AccessToken,
}

impl StaticTokenCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: AccessToken::new(token, None),
        }
    }
}

#[async_trait]
impl TokenCredential for StaticTokenCredential {
    async fn get_token(&self, _scope: &str) -> Result<AccessToken> {
        if self.token.token.is_empty() {
            return Err(AzureError::AuthenticationFailed(
                "empty access token".to_string(),
            ));
        }
        Ok(self.token.clone())
    }
}

/// Output of `az account get-access-token --output json`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliToken {
    access_token: String,
    /// POSIX timestamp, present in az >= 2.54
    #[serde(rename = "expires_on")]
    expires_on: Option<i64>,
}

/// Wraps `az account get-access-token`
#[derive(Debug, Default)]
pub struct AzureCliCredential {
    tenant_id: Option<String>,
}

impl AzureCliCredential {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tenant(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: Some(tenant_id.into()),
        }
    }

    fn parse_output(stdout: &str) -> Result<AccessToken> {
        let cli: CliToken = serde_json::from_str(stdout)?;
        let expires_at = cli
            .expires_on
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single());
        Ok(AccessToken::new(cli.access_token, expires_at))
    }
}

#[async_trait]
impl TokenCredential for AzureCliCredential {
    async fn get_token(&self, scope: &str) -> Result<AccessToken> {
        let resource = scope.trim_end_matches(".default");

        let mut cmd = Command::new("az");
        cmd.args([
            "account",
            "get-access-token",
            "--resource",
            resource,
            "--output",
            "json",
        ]);
        if let Some(tenant) = &self.tenant_id {
            cmd.arg("--tenant").arg(tenant);
        }
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Running: az account get-access-token --resource {}", resource);

        let output = match cmd.output().await {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AzureError::AzureCliNotFound);
            }
            Err(e) => return Err(e.into()),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("az login") {
                return Err(AzureError::AuthenticationFailed(stderr.trim().to_string()));
            }
            return Err(AzureError::CommandFailed(stderr.trim().to_string()));
        }

        Self::parse_output(&String::from_utf8_lossy(&output.stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_token_url() {
        assert_eq!(
            token_url("my-tenant"),
            "https://login.microsoftonline.com/my-tenant/oauth2/v2.0/token"
        );
    }

    #[test]
    fn test_token_expiry() {
        let fresh = AccessToken::new("a", Some(Utc::now() + Duration::hours(1)));
        assert!(!fresh.is_expired());

        let almost = AccessToken::new("a", Some(Utc::now() + Duration::seconds(30)));
        assert!(almost.is_expired());

        let forever = AccessToken::new("a", None);
        assert!(!forever.is_expired());
    }

    #[test]
    fn test_debug_hides_token() {
        let token = AccessToken::new("secret-value", None);
        assert!(!format!("{:?}", token).contains("secret-value"));
    }

    #[test]
    fn test_token_from_response() {
        let token = token_from_response(TokenResponse {
            access_token: "tok".to_string(),
            expires_in: Some(3600),
        });
        assert_eq!(token.token, "tok");
        assert!(token.expires_at.is_some());
        assert!(!token.is_expired());
    }

    #[test]
    fn test_parse_cli_output() {
        let stdout = r#"{
            "accessToken": "eyJ0eXAi",
            "expiresOn": "2030-01-01 00:00:00.000000",
            "expires_on": 1893456000,
            "subscription": "1",
            "tenant": "t",
            "tokenType": "Bearer"
        }"#;
        let token = AzureCliCredential::parse_output(stdout).unwrap();
        assert_eq!(token.token, "eyJ0eXAi");
        assert_eq!(token.expires_at.unwrap().timestamp(), 1893456000);
    }

    #[tokio::test]
    async fn test_static_credential() {
        let credential = StaticTokenCredential::new("abc");
        assert_eq!(credential.get_token(ARM_SCOPE).await.unwrap().token, "abc");

        let empty = StaticTokenCredential::new("");
        assert!(empty.get_token(ARM_SCOPE).await.is_err());
    }

    #[tokio::test]
    async fn test_cache_reuses_token() {
        let cache = TokenCache::default();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let token = cache
                .get_or_acquire(ARM_SCOPE, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(AccessToken::new("t", Some(Utc::now() + Duration::hours(1))))
                })
                .await
                .unwrap();
            assert_eq!(token.token, "t");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cache_refreshes_expired_token() {
        let cache = TokenCache::default();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            cache
                .get_or_acquire(ARM_SCOPE, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(AccessToken::new("t", Some(Utc::now())))
                })
                .await
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cache_does_not_store_failures() {
        let cache = TokenCache::default();
        let failed = cache
            .get_or_acquire(ARM_SCOPE, || async {
                Err(AzureError::AuthenticationFailed("denied".to_string()))
            })
            .await;
        assert!(failed.is_err());

        let token = cache
            .get_or_acquire(ARM_SCOPE, || async { Ok(AccessToken::new("t", None)) })
            .await
            .unwrap();
        assert_eq!(token.token, "t");
    }
}
