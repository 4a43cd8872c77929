//! Wire types for ARM and the Microsoft identity platform

use ezstart_core::{IdentifiedName, Resource};
use serde::Deserialize;

/// ARM management endpoint
pub const ARM_BASE: &str = "https://management.azure.com";

/// Microsoft identity platform authority
pub const AUTHORITY_BASE: &str = "https://login.microsoftonline.com";

pub const SUBSCRIPTIONS_API_VERSION: &str = "2022-12-01";
pub const RESOURCES_API_VERSION: &str = "2021-04-01";

/// Generic ARM list wrapper (`value` array with optional `nextLink`)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmList<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(default)]
    pub next_link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSubscription {
    pub subscription_id: Option<String>,
    pub display_name: Option<String>,
}

impl From<ApiSubscription> for IdentifiedName {
    fn from(s: ApiSubscription) -> Self {
        IdentifiedName {
            id: s.subscription_id,
            name: s.display_name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiResourceGroup {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiResource {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub r#type: Option<String>,
}

impl ApiResource {
    /// Resources without a name cannot be selected and are dropped
    pub fn into_resource(self) -> Option<Resource> {
        let name = self.name.filter(|n| !n.is_empty())?;
        Some(Resource::new(name, self.r#type.unwrap_or_default()))
    }
}

/// Token endpoint success response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Token endpoint error response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenErrorResponse {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}
