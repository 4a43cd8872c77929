//! Adapter traits for the external collaborators

use crate::error::Result;
use crate::model::{IdentifiedName, Resource};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Cloud inventory abstraction
///
/// Implementations authenticate on every call and drain paged listings
/// fully into memory before returning.
#[async_trait]
pub trait CloudInventory: Send + Sync {
    /// Returns the inventory name for logs (e.g., "azure")
    fn name(&self) -> &str;

    /// List all subscriptions visible to the credential
    async fn list_subscriptions(&self) -> Result<Vec<IdentifiedName>>;

    /// List resource group names of a subscription
    async fn list_resource_groups(&self, subscription_id: &str) -> Result<Vec<String>>;

    /// List every resource in a resource group.
    ///
    /// Filtering by resource type is the caller's job.
    async fn list_resources(
        &self,
        subscription_id: &str,
        resource_group: &str,
    ) -> Result<Vec<Resource>>;
}

/// Remote automation abstraction
///
/// The target repository and the token are bound when the client is built.
#[async_trait]
pub trait AutomationClient: Send + Sync {
    /// Encrypt `secret_value` with the repository key and store it as `secret_name`
    async fn set_secret(&self, secret_name: &str, secret_value: &str) -> Result<()>;

    /// Trigger `workflow_file` on `git_ref` with string inputs
    async fn dispatch_workflow(
        &self,
        workflow_file: &str,
        git_ref: &str,
        inputs: &BTreeMap<String, String>,
    ) -> Result<()>;
}
