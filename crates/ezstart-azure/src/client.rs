//! Azure Resource Manager HTTP client
//!
//! Bearer-token injection, `nextLink` pagination and ARM error extraction.

use crate::credential::{ARM_SCOPE, TokenCredential};
use crate::error::{AzureError, Result};
use crate::types::{
    ARM_BASE, ApiResource, ApiResourceGroup, ApiSubscription, ArmList, RESOURCES_API_VERSION,
    SUBSCRIPTIONS_API_VERSION,
};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub struct ArmClient {
    http: reqwest::Client,
    base_url: Url,
    credential: Arc<dyn TokenCredential>,
}

impl ArmClient {
    pub fn new(credential: Arc<dyn TokenCredential>) -> Result<Self> {
        Self::with_base_url(credential, ARM_BASE)
    }

    /// Point the client at a different ARM endpoint (sovereign clouds, tests)
    pub fn with_base_url(credential: Arc<dyn TokenCredential>, base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
            credential,
        })
    }

    fn url(&self, segments: &[&str], api_version: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AzureError::InvalidConfig(format!("invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut().append_pair("api-version", api_version);
        Ok(url)
    }

    pub fn subscriptions_url(&self) -> Result<Url> {
        self.url(&["subscriptions"], SUBSCRIPTIONS_API_VERSION)
    }

    pub fn resource_groups_url(&self, subscription_id: &str) -> Result<Url> {
        self.url(
            &["subscriptions", subscription_id, "resourcegroups"],
            RESOURCES_API_VERSION,
        )
    }

    pub fn resources_url(&self, subscription_id: &str, resource_group: &str) -> Result<Url> {
        self.url(
            &[
                "subscriptions",
                subscription_id,
                "resourceGroups",
                resource_group,
                "resources",
            ],
            RESOURCES_API_VERSION,
        )
    }

    /// GET a list endpoint and follow `nextLink` until exhausted
    ///
    /// A `nextLink` pointing at an already fetched page is an error.
    pub async fn get_all_pages<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>> {
        let token = self.credential.get_token(ARM_SCOPE).await?;

        let mut items = Vec::new();
        let mut fetched = HashSet::new();
        let mut next = Some(url.to_string());

        while let Some(url) = next.take() {
            if !fetched.insert(url.clone()) {
                return Err(AzureError::PaginationLoop(url));
            }

            tracing::debug!("ARM GET {}", url);
            let response = self
                .http
                .get(&url)
                .bearer_auth(&token.token)
                .send()
                .await?;

            let status = response.status();
            let body = response.text().await?;
            if !status.is_success() {
                return Err(AzureError::from_status(status.as_u16(), &body));
            }

            let page: ArmList<T> = serde_json::from_str(&body)?;
            items.extend(page.value);
            next = page.next_link.filter(|link| !link.is_empty());
        }

        Ok(items)
    }

    pub async fn list_subscriptions(&self) -> Result<Vec<ApiSubscription>> {
        self.get_all_pages(self.subscriptions_url()?).await
    }

    pub async fn list_resource_groups(&self, subscription_id: &str) -> Result<Vec<ApiResourceGroup>> {
        self.get_all_pages(self.resource_groups_url(subscription_id)?)
            .await
    }

    pub async fn list_resources(
        &self,
        subscription_id: &str,
        resource_group: &str,
    ) -> Result<Vec<ApiResource>> {
        self.get_all_pages(self.resources_url(subscription_id, resource_group)?)
            .await
    }
}
