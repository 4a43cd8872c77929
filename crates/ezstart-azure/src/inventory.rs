//! `CloudInventory` backed by Azure Resource Manager

use crate::client::ArmClient;
use crate::credential::TokenCredential;
use crate::error::Result;
use async_trait::async_trait;
use ezstart_core::{CloudInventory, IdentifiedName, Resource};
use std::sync::Arc;

pub struct AzureInventory {
    client: ArmClient,
}

impl AzureInventory {
    pub fn new(credential: Arc<dyn TokenCredential>) -> Result<Self> {
        Ok(Self {
            client: ArmClient::new(credential)?,
        })
    }

    pub fn from_client(client: ArmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CloudInventory for AzureInventory {
    fn name(&self) -> &str {
        "azure"
    }

    async fn list_subscriptions(&self) -> ezstart_core::Result<Vec<IdentifiedName>> {
        let subscriptions = self.client.list_subscriptions().await?;
        tracing::debug!("Fetched {} subscriptions", subscriptions.len());
        Ok(subscriptions.into_iter().map(IdentifiedName::from).collect())
    }

    async fn list_resource_groups(&self, subscription_id: &str) -> ezstart_core::Result<Vec<String>> {
        let groups = self.client.list_resource_groups(subscription_id).await?;
        let names: Vec<String> = groups
            .into_iter()
            .filter_map(|g| g.name.filter(|n| !n.is_empty()))
            .collect();
        tracing::debug!(
            "Fetched {} resource groups in {}",
            names.len(),
            subscription_id
        );
        Ok(names)
    }

    async fn list_resources(
        &self,
        subscription_id: &str,
        resource_group: &str,
    ) -> ezstart_core::Result<Vec<Resource>> {
        let resources = self
            .client
            .list_resources(subscription_id, resource_group)
            .await?;
        Ok(resources
            .into_iter()
            .filter_map(|r| r.into_resource())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::serve;
    use crate::credential::StaticTokenCredential;
    use ezstart_core::{CoreError, filter_resource_names};

    fn inventory(base: &str) -> AzureInventory {
        let client =
            ArmClient::with_base_url(Arc::new(StaticTokenCredential::new("tok")), base).unwrap();
        AzureInventory::from_client(client)
    }

    #[tokio::test]
    async fn test_list_subscriptions() {
        let (base, _) = serve(vec![(
            200,
            r#"{"value":[
                {"subscriptionId":"1","displayName":"Sub1"},
                {"subscriptionId":"2","displayName":"Sub2"}
            ]}"#
            .to_string(),
        )])
        .await;

        let subscriptions = inventory(&base).list_subscriptions().await.unwrap();
        assert_eq!(
            subscriptions,
            vec![IdentifiedName::new("1", "Sub1"), IdentifiedName::new("2", "Sub2")]
        );
    }

    #[tokio::test]
    async fn test_list_resources_then_filter() {
        let (base, seen) = serve(vec![(
            200,
            r#"{"value":[
                {"name":"web-1","type":"Microsoft.Web/sites"},
                {"name":"aks-1","type":"Microsoft.Kubernetes/clusters"},
                {"type":"Microsoft.Web/sites"}
            ]}"#
            .to_string(),
        )])
        .await;

        let resources = inventory(&base).list_resources("1", "rg").await.unwrap();
        assert_eq!(resources.len(), 2);
        assert_eq!(
            filter_resource_names(&resources, "Microsoft.Web/sites"),
            vec!["web-1".to_string()]
        );
        assert!(
            seen.lock().unwrap()[0].starts_with("GET /subscriptions/1/resourceGroups/rg/resources")
        );
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_auth_error() {
        let (base, _) = serve(vec![(401, String::new())]).await;
        let err = inventory(&base).list_resource_groups("1").await.unwrap_err();
        assert!(matches!(err, CoreError::AuthenticationFailed(_)));
    }
}
