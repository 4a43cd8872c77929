//! Actions repository secrets

use crate::client::GithubClient;
use crate::crypto::encrypt_secret;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Response of `GET /repos/{owner}/{repo}/actions/secrets/public-key`
#[derive(Debug, Clone, Deserialize)]
pub struct RepoPublicKey {
    pub key_id: String,
    pub key: String,
}

#[derive(Debug, Serialize)]
struct PutSecretBody<'a> {
    encrypted_value: &'a str,
    key_id: &'a str,
}

impl GithubClient {
    pub async fn get_public_key(&self) -> Result<RepoPublicKey> {
        let url = self.repo_url(&["actions", "secrets", "public-key"])?;
        let response = self.authorize(self.http.get(url)).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Fetch the repository key, encrypt `value` and create or update `name`
    pub async fn put_secret(&self, name: &str, value: &str) -> Result<()> {
        let public_key = self.get_public_key().await?;
        let encrypted_value = encrypt_secret(&public_key.key, value)?;

        let url = self.repo_url(&["actions", "secrets", name])?;
        let body = PutSecretBody {
            encrypted_value: &encrypted_value,
            key_id: &public_key.key_id,
        };
        let response = self.authorize(self.http.put(url)).json(&body).send().await?;
        Self::check(response).await?;

        tracing::info!("Secret '{}' set on {}", name, self.full_name());
        Ok(())
    }
}
