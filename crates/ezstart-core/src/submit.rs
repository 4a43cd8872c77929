//! Start アクションで発行されるタスク

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 送信に必要な 4 つの選択値
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub subscription_id: String,
    pub resource_group: String,
    pub resource_type: String,
    pub resource_name: String,
}

impl SubmitRequest {
    /// workflow dispatch の inputs
    pub fn workflow_inputs(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("subscription".to_string(), self.subscription_id.clone()),
            ("resourceGroup".to_string(), self.resource_group.clone()),
            ("resourceType".to_string(), self.resource_type.clone()),
            ("resourceName".to_string(), self.resource_name.clone()),
        ])
    }
}

/// 送信先の設定（設定ファイルから注入される）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitSettings {
    /// 選択したリソース名を格納するシークレット名
    pub secret_name: String,
    pub workflow_file: String,
    pub git_ref: String,
}

impl Default for SubmitSettings {
    fn default() -> Self {
        Self {
            secret_name: "RESOURCE_NAME".to_string(),
            workflow_file: "use-github-secrets.yml".to_string(),
            git_ref: "master".to_string(),
        }
    }
}

/// Start で並行に走る 2 つのタスク
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitTask {
    Secret,
    Workflow,
}

impl std::fmt::Display for SubmitTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitTask::Secret => write!(f, "secret"),
            SubmitTask::Workflow => write!(f, "workflow dispatch"),
        }
    }
}

/// タスクの状態
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Succeeded,
    Failed(String),
}

impl TaskStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, TaskStatus::Pending)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Succeeded => write!(f, "succeeded"),
            TaskStatus::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// 1 回の Start で作られる送信
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: u64,
    pub request: SubmitRequest,
    pub secret: TaskStatus,
    pub workflow: TaskStatus,
}

impl Submission {
    pub fn new(id: u64, request: SubmitRequest) -> Self {
        Self {
            id,
            request,
            secret: TaskStatus::Pending,
            workflow: TaskStatus::Pending,
        }
    }

    pub fn status(&self, task: SubmitTask) -> &TaskStatus {
        match task {
            SubmitTask::Secret => &self.secret,
            SubmitTask::Workflow => &self.workflow,
        }
    }

    pub fn set_status(&mut self, task: SubmitTask, status: TaskStatus) {
        match task {
            SubmitTask::Secret => self.secret = status,
            SubmitTask::Workflow => self.workflow = status,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.secret.is_finished() && self.workflow.is_finished()
    }

    pub fn is_success(&self) -> bool {
        self.secret == TaskStatus::Succeeded && self.workflow == TaskStatus::Succeeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SubmitRequest {
        SubmitRequest {
            subscription_id: "1".to_string(),
            resource_group: "rg".to_string(),
            resource_type: "Microsoft.Web/sites".to_string(),
            resource_name: "web".to_string(),
        }
    }

    #[test]
    fn test_workflow_inputs_keys() {
        let inputs = request().workflow_inputs();
        assert_eq!(inputs.len(), 4);
        assert_eq!(inputs["subscription"], "1");
        assert_eq!(inputs["resourceGroup"], "rg");
        assert_eq!(inputs["resourceType"], "Microsoft.Web/sites");
        assert_eq!(inputs["resourceName"], "web");
    }

    #[test]
    fn test_submission_progress() {
        let mut submission = Submission::new(1, request());
        assert!(!submission.is_finished());

        submission.set_status(SubmitTask::Secret, TaskStatus::Failed("403".to_string()));
        assert!(!submission.is_finished());

        submission.set_status(SubmitTask::Workflow, TaskStatus::Succeeded);
        assert!(submission.is_finished());
        assert!(!submission.is_success());
        assert_eq!(submission.status(SubmitTask::Secret).to_string(), "failed: 403");
    }
}
