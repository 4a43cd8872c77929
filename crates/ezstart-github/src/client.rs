//! GitHub REST client bound to one repository

use crate::error::{GithubError, Result};
use async_trait::async_trait;
use ezstart_core::AutomationClient;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

pub const GITHUB_API_BASE: &str = "https://api.github.com";

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

pub struct GithubClient {
    pub(crate) http: reqwest::Client,
    api_base: Url,
    owner: String,
    repo: String,
    token: String,
}

impl GithubClient {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self> {
        Self::with_api_base(owner, repo, token, GITHUB_API_BASE)
    }

    /// Use a different API root (GitHub Enterprise Server, tests)
    pub fn with_api_base(
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
        api_base: &str,
    ) -> Result<Self> {
        let owner = owner.into();
        let repo = repo.into();
        if owner.is_empty() || repo.is_empty() {
            return Err(GithubError::InvalidConfig(
                "repository owner and name are required".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(USER_AGENT, HeaderValue::from_static("ezstart"));
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            api_base: Url::parse(api_base)?,
            owner,
            repo,
            token: token.into(),
        })
    }

    /// "owner/repo"
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// `{api_base}/repos/{owner}/{repo}/{segments...}`
    pub(crate) fn repo_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| GithubError::InvalidConfig(format!("invalid API base: {}", self.api_base)))?
            .pop_if_empty()
            .extend(["repos", self.owner.as_str(), self.repo.as_str()])
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.token.is_empty() {
            request
        } else {
            request.bearer_auth(&self.token)
        }
    }

    /// Turn a non-success response into `GithubError::Api`
    pub(crate) async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(GithubError::from_status(status.as_u16(), &body))
    }
}

#[async_trait]
impl AutomationClient for GithubClient {
    async fn set_secret(&self, secret_name: &str, secret_value: &str) -> ezstart_core::Result<()> {
        Ok(self.put_secret(secret_name, secret_value).await?)
    }

    async fn dispatch_workflow(
        &self,
        workflow_file: &str,
        git_ref: &str,
        inputs: &BTreeMap<String, String>,
    ) -> ezstart_core::Result<()> {
        Ok(self.create_dispatch(workflow_file, git_ref, inputs).await?)
    }
}
