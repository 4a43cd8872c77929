pub mod config;
pub mod dispatch;
pub mod list;
pub mod secret;
pub mod start;

use ezstart_core::{IdentifiedName, get_subscription_id_by_name};

/// 名前または ID からサブスクリプションを特定する（名前が優先）
pub fn resolve_subscription(
    subscriptions: &[IdentifiedName],
    name_or_id: &str,
) -> anyhow::Result<IdentifiedName> {
    if let Some(id) = get_subscription_id_by_name(subscriptions, name_or_id) {
        return Ok(IdentifiedName {
            id: Some(id),
            name: Some(name_or_id.to_string()),
        });
    }

    subscriptions
        .iter()
        .find(|s| s.id.as_deref() == Some(name_or_id))
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("サブスクリプション '{}' が見つかりません", name_or_id))
}

/// 名前または ID からサブスクリプション ID を引く。ID の無いものはエラー
pub fn resolve_subscription_id(
    subscriptions: &[IdentifiedName],
    name_or_id: &str,
) -> anyhow::Result<String> {
    resolve_subscription(subscriptions, name_or_id)?
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| anyhow::anyhow!("サブスクリプション '{}' には ID がありません", name_or_id))
}

/// フォームの選択で同じサブスクリプションに解決される名前を返す
///
/// 選択は名前から最初に一致した ID を引くため、名前が無いものや
/// 同名の別サブスクリプションの後ろにあるものは選べない。
pub fn selectable_subscription_name(
    subscriptions: &[IdentifiedName],
    name_or_id: &str,
) -> anyhow::Result<String> {
    let sub = resolve_subscription(subscriptions, name_or_id)?;
    let Some(id) = sub.id.filter(|id| !id.is_empty()) else {
        anyhow::bail!("サブスクリプション '{}' には ID がありません", name_or_id);
    };
    let Some(name) = sub.name.filter(|name| !name.is_empty()) else {
        anyhow::bail!("サブスクリプション '{}' には名前がありません", name_or_id);
    };

    if get_subscription_id_by_name(subscriptions, &name).as_deref() != Some(id.as_str()) {
        anyhow::bail!(
            "サブスクリプション名 '{}' が重複しているため '{}' を選択できません",
            name,
            name_or_id
        );
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ezstart_core::{Effect, Event, Selection};

    fn subscriptions() -> Vec<IdentifiedName> {
        vec![
            IdentifiedName::new("1111", "Production"),
            IdentifiedName::new("2222", "Staging"),
        ]
    }

    #[test]
    fn test_resolve_by_name() {
        let sub = resolve_subscription(&subscriptions(), "Staging").unwrap();
        assert_eq!(sub.id.as_deref(), Some("2222"));
    }

    #[test]
    fn test_resolve_by_id() {
        let sub = resolve_subscription(&subscriptions(), "1111").unwrap();
        assert_eq!(sub.name.as_deref(), Some("Production"));
    }

    #[test]
    fn test_resolve_unknown() {
        assert!(resolve_subscription(&subscriptions(), "Dev").is_err());
    }

    #[test]
    fn test_resolve_id_requires_id() {
        let orphaned = vec![IdentifiedName {
            id: None,
            name: Some("Orphan".into()),
        }];
        let err = resolve_subscription_id(&orphaned, "Orphan").unwrap_err();
        assert!(err.to_string().contains("ID がありません"));
        assert_eq!(resolve_subscription_id(&subscriptions(), "Staging").unwrap(), "2222");
    }

    #[test]
    fn test_selectable_name_by_id() {
        let name = selectable_subscription_name(&subscriptions(), "2222").unwrap();
        assert_eq!(name, "Staging");
    }

    #[test]
    fn test_selectable_name_rejects_shadowed_duplicate() {
        let subscriptions = vec![
            IdentifiedName::new("1", "Dup"),
            IdentifiedName::new("2", "Dup"),
        ];
        // 先頭の同名サブスクリプションは選べる
        assert_eq!(
            selectable_subscription_name(&subscriptions, "1").unwrap(),
            "Dup"
        );
        let err = selectable_subscription_name(&subscriptions, "2").unwrap_err();
        assert!(err.to_string().contains("重複"));
    }

    #[test]
    fn test_selectable_name_selects_same_subscription() {
        let subscriptions = vec![
            IdentifiedName::new("1", "Dup"),
            IdentifiedName::new("2", "Other"),
            IdentifiedName::new("3", "Dup"),
        ];
        let mut selection = Selection::new();
        let effects = selection.apply(Event::Mounted);
        let Some(Effect::ListSubscriptions { request }) = effects.first().cloned() else {
            panic!("expected a subscription fetch");
        };
        selection.apply(Event::SubscriptionsLoaded {
            request,
            subscriptions: subscriptions.clone(),
        });

        let name = selectable_subscription_name(&subscriptions, "2").unwrap();
        let effects = selection.apply(Event::SubscriptionSelected(name));
        assert!(matches!(
            effects.as_slice(),
            [Effect::ListResourceGroups { subscription_id, .. }] if subscription_id == "2"
        ));
        assert!(selectable_subscription_name(&subscriptions, "3").is_err());
    }

    #[test]
    fn test_selectable_name_requires_name() {
        let subscriptions = vec![IdentifiedName {
            id: Some("3333".into()),
            name: None,
        }];
        let err = selectable_subscription_name(&subscriptions, "3333").unwrap_err();
        assert!(err.to_string().contains("名前がありません"));
    }
}
