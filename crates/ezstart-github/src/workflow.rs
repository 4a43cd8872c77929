//! workflow_dispatch trigger

use crate::client::GithubClient;
use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
struct DispatchBody<'a> {
    #[serde(rename = "ref")]
    git_ref: &'a str,
    inputs: &'a BTreeMap<String, String>,
}

impl GithubClient {
    /// `POST /repos/{owner}/{repo}/actions/workflows/{workflow_file}/dispatches`
    ///
    /// GitHub answers 204 without a run id; the run has to be looked up
    /// separately if needed.
    pub async fn create_dispatch(
        &self,
        workflow_file: &str,
        git_ref: &str,
        inputs: &BTreeMap<String, String>,
    ) -> Result<()> {
        let url = self.repo_url(&["actions", "workflows", workflow_file, "dispatches"])?;
        let body = DispatchBody { git_ref, inputs };
        let response = self.authorize(self.http.post(url)).json(&body).send().await?;
        Self::check(response).await?;

        tracing::info!(
            "Workflow '{}' dispatched on {}@{}",
            workflow_file,
            self.full_name(),
            git_ref
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::serve;
    use ezstart_core::{AutomationClient, CoreError};

    fn inputs() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("resourceName".to_string(), "web-1".to_string()),
            ("subscription".to_string(), "sub-1".to_string()),
        ])
    }

    #[tokio::test]
    async fn test_dispatch_body() {
        let (base, seen) = serve(vec![(204, String::new())]).await;
        let client = GithubClient::with_api_base("octo", "app", "t", &base).unwrap();

        client
            .dispatch_workflow("use-github-secrets.yml", "master", &inputs())
            .await
            .unwrap();

        let requests = seen.lock().unwrap();
        assert_eq!(
            requests[0].request_line,
            "POST /repos/octo/app/actions/workflows/use-github-secrets.yml/dispatches HTTP/1.1"
        );
        let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "ref": "master",
                "inputs": {"resourceName": "web-1", "subscription": "sub-1"}
            })
        );
    }

    #[tokio::test]
    async fn test_dispatch_rejected() {
        let (base, _) = serve(vec![(
            422,
            r#"{"message":"Workflow does not have 'workflow_dispatch' trigger"}"#.to_string(),
        )])
        .await;
        let client = GithubClient::with_api_base("octo", "app", "t", &base).unwrap();

        let err = client
            .dispatch_workflow("ci.yml", "main", &BTreeMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ApiError(ref m) if m.contains("workflow_dispatch")));
    }
}
