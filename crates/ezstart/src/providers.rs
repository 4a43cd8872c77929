//! 設定からアダプターを組み立てる

use anyhow::Context;
use ezstart_azure::{
    ARM_SCOPE, AzureCliCredential, AzureInventory, BrowserCredential, DeviceCodeCredential,
    StaticTokenCredential, TokenCredential,
};
use ezstart_config::{AppConfig, AuthMode};
use ezstart_core::{AutomationClient, CloudInventory};
use ezstart_github::GithubClient;
use std::sync::Arc;

/// 認証方式に応じた Azure の資格情報
pub fn build_credential(config: &AppConfig) -> anyhow::Result<Arc<dyn TokenCredential>> {
    config.validate_azure()?;
    let azure = &config.azure;

    let credential: Arc<dyn TokenCredential> = match azure.auth {
        AuthMode::Browser => Arc::new(BrowserCredential::new(
            azure.client_id.clone(),
            azure.tenant_id.clone(),
            &azure.redirect_uri,
        )?),
        AuthMode::DeviceCode => Arc::new(
            DeviceCodeCredential::new(azure.client_id.clone(), azure.tenant_id.clone())
                .with_browser(true),
        ),
        AuthMode::AzureCli => {
            if azure.tenant_id.is_empty() || azure.tenant_id == "organizations" {
                Arc::new(AzureCliCredential::new())
            } else {
                Arc::new(AzureCliCredential::with_tenant(azure.tenant_id.clone()))
            }
        }
        AuthMode::Token => Arc::new(StaticTokenCredential::new(
            azure.access_token.clone().unwrap_or_default(),
        )),
    };
    tracing::debug!("Using Azure auth mode: {}", azure.auth);
    Ok(credential)
}

/// サインインを先に済ませる
///
/// ブラウザやデバイスコードの案内を TUI の代替画面より前に出すため。
pub async fn sign_in(credential: &dyn TokenCredential) -> anyhow::Result<()> {
    credential
        .get_token(ARM_SCOPE)
        .await
        .context("Azure へのサインインに失敗しました")?;
    Ok(())
}

pub fn build_inventory(
    credential: Arc<dyn TokenCredential>,
) -> anyhow::Result<Arc<dyn CloudInventory>> {
    Ok(Arc::new(AzureInventory::new(credential)?))
}

pub fn build_github(config: &AppConfig) -> anyhow::Result<GithubClient> {
    config.validate_github()?;
    let github = &config.github;
    Ok(GithubClient::with_api_base(
        github.owner.clone(),
        github.repo.clone(),
        github.token.clone(),
        &github.api_base,
    )?)
}

pub fn build_automation(config: &AppConfig) -> anyhow::Result<Arc<dyn AutomationClient>> {
    Ok(Arc::new(build_github(config)?))
}
