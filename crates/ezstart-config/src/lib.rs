//! ezstart の設定
//!
//! Azure のサインイン設定と GitHub の送信先を YAML ファイルと環境変数から読み込みます。
//! 読み込んだ [`AppConfig`] は起動時に検証され、各コンポーネントへ明示的に渡されます。

pub mod error;

pub use error::*;

use ezstart_core::SubmitSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_CANDIDATES: [&str; 2] = ["ezstart.local.yaml", "ezstart.yaml"];

/// Azure へのサインイン方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMode {
    /// ブラウザでの対話ログイン (authorization code + PKCE)
    #[default]
    Browser,
    /// デバイスコードフロー
    DeviceCode,
    /// `az account get-access-token`
    AzureCli,
    /// 取得済みのアクセストークン
    Token,
}

impl std::str::FromStr for AuthMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "browser" => Ok(AuthMode::Browser),
            "device-code" => Ok(AuthMode::DeviceCode),
            "azure-cli" => Ok(AuthMode::AzureCli),
            "token" => Ok(AuthMode::Token),
            other => Err(ConfigError::Invalid(format!(
                "不明な認証方式です: {} (browser, device-code, azure-cli, token)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AuthMode::Browser => "browser",
            AuthMode::DeviceCode => "device-code",
            AuthMode::AzureCli => "azure-cli",
            AuthMode::Token => "token",
        };
        f.write_str(name)
    }
}

/// Azure 側の設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureSettings {
    pub client_id: String,
    pub tenant_id: String,
    pub redirect_uri: String,
    pub auth: AuthMode,
    /// `auth: token` のときに使うトークン
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl Default for AzureSettings {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            tenant_id: "organizations".to_string(),
            redirect_uri: "http://localhost:3000".to_string(),
            auth: AuthMode::default(),
            access_token: None,
        }
    }
}

/// GitHub 側の設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubSettings {
    pub owner: String,
    pub repo: String,
    pub token: String,
    pub workflow_file: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    /// Start 時に選択したリソース名を格納するシークレット名
    pub secret_name: String,
    pub api_base: String,
}

impl Default for GithubSettings {
    fn default() -> Self {
        let submit = SubmitSettings::default();
        Self {
            owner: String::new(),
            repo: String::new(),
            token: String::new(),
            workflow_file: submit.workflow_file,
            git_ref: submit.git_ref,
            secret_name: submit.secret_name,
            api_base: "https://api.github.com".to_string(),
        }
    }
}

/// アプリケーション設定
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub azure: AzureSettings,
    pub github: GithubSettings,
}

impl AppConfig {
    /// 設定ファイル（あれば）と環境変数から読み込む
    pub fn load() -> Result<Self> {
        let mut config = match find_config_file() {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                Self::from_file(&path)?
            }
            None => {
                tracing::debug!("No config file found, using defaults");
                Self::default()
            }
        };
        config.apply_env()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `EZSTART_*` 環境変数で上書きする
    pub fn apply_env(&mut self) -> Result<()> {
        let azure = &mut self.azure;
        override_with(&mut azure.client_id, "EZSTART_AZURE_CLIENT_ID");
        override_with(&mut azure.tenant_id, "EZSTART_AZURE_TENANT_ID");
        override_with(&mut azure.redirect_uri, "EZSTART_AZURE_REDIRECT_URI");
        if let Some(mode) = env_var("EZSTART_AZURE_AUTH") {
            azure.auth = mode.parse()?;
        }
        if let Some(token) = env_var("AZURE_ACCESS_TOKEN") {
            azure.access_token = Some(token);
        }

        let github = &mut self.github;
        override_with(&mut github.owner, "EZSTART_GITHUB_OWNER");
        override_with(&mut github.repo, "EZSTART_GITHUB_REPO");
        override_with(&mut github.token, "EZSTART_GITHUB_TOKEN");
        override_with(&mut github.workflow_file, "EZSTART_GITHUB_WORKFLOW_FILE");
        override_with(&mut github.git_ref, "EZSTART_GITHUB_REF");
        override_with(&mut github.secret_name, "EZSTART_GITHUB_SECRET_NAME");
        Ok(())
    }

    /// Azure 側の設定を検証
    pub fn validate_azure(&self) -> Result<()> {
        let azure = &self.azure;
        match azure.auth {
            AuthMode::Browser | AuthMode::DeviceCode => {
                require(&azure.client_id, "azure.client_id")?;
                require(&azure.tenant_id, "azure.tenant_id")?;
                if azure.auth == AuthMode::Browser {
                    require(&azure.redirect_uri, "azure.redirect_uri")?;
                }
            }
            AuthMode::Token => {
                require(
                    azure.access_token.as_deref().unwrap_or_default(),
                    "azure.access_token (AZURE_ACCESS_TOKEN)",
                )?;
            }
            AuthMode::AzureCli => {}
        }
        Ok(())
    }

    /// GitHub 側の設定を検証
    pub fn validate_github(&self) -> Result<()> {
        let github = &self.github;
        require(&github.owner, "github.owner")?;
        require(&github.repo, "github.repo")?;
        require(&github.token, "github.token")?;
        require(&github.workflow_file, "github.workflow_file")?;
        require(&github.git_ref, "github.ref")?;
        require(&github.secret_name, "github.secret_name")?;
        require(&github.api_base, "github.api_base")?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.validate_azure()?;
        self.validate_github()
    }

    pub fn submit_settings(&self) -> SubmitSettings {
        SubmitSettings {
            secret_name: self.github.secret_name.clone(),
            workflow_file: self.github.workflow_file.clone(),
            git_ref: self.github.git_ref.clone(),
        }
    }

    /// トークン類を伏せたコピー（表示用）
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if !config.github.token.is_empty() {
            config.github.token = "********".to_string();
        }
        if config.azure.access_token.is_some() {
            config.azure.access_token = Some("********".to_string());
        }
        config
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn override_with(field: &mut String, name: &str) {
    if let Some(value) = env_var(name) {
        *field = value;
    }
}

fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{} が設定されていません", field)));
    }
    Ok(())
}

/// 設定ファイルを探す
///
/// 以下の優先順位で検索:
/// 1. 環境変数 EZSTART_CONFIG_PATH (直接パス指定)
/// 2. カレントディレクトリ: ezstart.local.yaml, ezstart.yaml
/// 3. ./.ezstart/ ディレクトリ内: 同様の順序
/// 4. ~/.config/ezstart/config.yaml (グローバル設定)
pub fn find_config_file() -> Option<PathBuf> {
    // 1. 環境変数で直接指定
    if let Some(config_path) = env_var("EZSTART_CONFIG_PATH") {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Some(path);
        }
        tracing::warn!("EZSTART_CONFIG_PATH does not exist: {}", path.display());
    }

    if let Ok(current_dir) = std::env::current_dir() {
        // 2. カレントディレクトリで検索
        for filename in &CONFIG_FILE_CANDIDATES {
            let path = current_dir.join(filename);
            if path.exists() {
                return Some(path);
            }
        }

        // 3. ./.ezstart/ ディレクトリで検索
        let local_dir = current_dir.join(".ezstart");
        if local_dir.is_dir() {
            for filename in &CONFIG_FILE_CANDIDATES {
                let path = local_dir.join(filename);
                if path.exists() {
                    return Some(path);
                }
            }
        }
    }

    // 4. グローバル設定ファイル
    dirs::config_dir()
        .map(|dir| dir.join("ezstart").join("config.yaml"))
        .filter(|path| path.exists())
}
