//! データモデル
//!
//! サブスクリプション、リソース、リソース種別のマッピングを定義します。

use serde::{Deserialize, Serialize};

/// ID と表示名の組（サブスクリプションを表す）
///
/// `name` が `None` のエントリは選択肢に表示されないが、リストには残る。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifiedName {
    /// 後続の問い合わせに使う安定キー
    pub id: Option<String>,
    /// ユーザーに表示するラベル
    pub name: Option<String>,
}

impl IdentifiedName {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
        }
    }
}

/// リソースグループ内のリソース
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    /// プロバイダーのリソース種別 (例: "Microsoft.Web/sites")
    #[serde(rename = "type")]
    pub resource_type: String,
}

impl Resource {
    pub fn new(name: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource_type: resource_type.into(),
        }
    }
}

/// フォームで選択できるリソース種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    WebApp,
    KubernetesService,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 2] = [ResourceKind::WebApp, ResourceKind::KubernetesService];

    /// ドロップダウンに表示するラベル
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::WebApp => "Web App",
            ResourceKind::KubernetesService => "Kubernetes Service",
        }
    }

    /// Azure のプロバイダー種別文字列
    pub fn provider_type(&self) -> &'static str {
        match self {
            ResourceKind::WebApp => "Microsoft.Web/sites",
            ResourceKind::KubernetesService => "Microsoft.Kubernetes/clusters",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }

    /// 全ラベル（表示順）
    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|kind| kind.label()).collect()
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// ラベルをプロバイダー種別に変換する。未知のラベルは空文字列。
pub fn resource_type_for_label(label: &str) -> &'static str {
    ResourceKind::from_label(label)
        .map(|kind| kind.provider_type())
        .unwrap_or("")
}

/// 名前を持つエントリの名前だけを順序を保って返す
pub fn get_subscription_names(subscriptions: &[IdentifiedName]) -> Vec<String> {
    subscriptions
        .iter()
        .filter_map(|sub| sub.name.clone())
        .collect()
}

/// 名前が完全一致する最初のエントリの ID を返す（大文字小文字を区別）
pub fn get_subscription_id_by_name(subscriptions: &[IdentifiedName], name: &str) -> Option<String> {
    subscriptions
        .iter()
        .find(|sub| sub.name.as_deref() == Some(name))
        .and_then(|sub| sub.id.clone())
}

/// 種別が完全一致するリソースの名前を返す
///
/// 空の種別はどのリソースにも一致しない。
pub fn filter_resource_names(resources: &[Resource], resource_type: &str) -> Vec<String> {
    if resource_type.is_empty() {
        return Vec::new();
    }

    resources
        .iter()
        .filter(|r| r.resource_type == resource_type && !r.name.is_empty())
        .map(|r| r.name.clone())
        .collect()
}
