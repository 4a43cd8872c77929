use super::resolve_subscription_id;
use crate::providers;
use colored::Colorize;
use ezstart_config::AppConfig;
use ezstart_core::{ResourceKind, filter_resource_names};

pub async fn subscriptions(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let credential = providers::build_credential(config)?;
    let inventory = providers::build_inventory(credential)?;

    let subscriptions = inventory.list_subscriptions().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&subscriptions)?);
        return Ok(());
    }

    if subscriptions.is_empty() {
        println!("{}", "サブスクリプションが見つかりません".dimmed());
        return Ok(());
    }

    println!("{}", format!("{:<40} {:<36}", "NAME", "ID").bold());
    println!("{}", "─".repeat(77).dimmed());
    for sub in &subscriptions {
        let name = format!("{:<40}", sub.name.as_deref().unwrap_or("N/A"));
        println!("{} {}", name.cyan(), sub.id.as_deref().unwrap_or("N/A"));
    }
    Ok(())
}

pub async fn groups(config: &AppConfig, subscription: &str, json: bool) -> anyhow::Result<()> {
    let credential = providers::build_credential(config)?;
    let inventory = providers::build_inventory(credential)?;

    let subscriptions = inventory.list_subscriptions().await?;
    let subscription_id = resolve_subscription_id(&subscriptions, subscription)?;

    let groups = inventory.list_resource_groups(&subscription_id).await?;
    print_names(&groups, json, "リソースグループが見つかりません")
}

pub async fn resources(
    config: &AppConfig,
    subscription: &str,
    group: &str,
    resource_type: &str,
    json: bool,
) -> anyhow::Result<()> {
    let kind = ResourceKind::from_label(resource_type).ok_or_else(|| {
        anyhow::anyhow!(
            "不明なリソース種別です: {} (利用可能: {})",
            resource_type,
            ResourceKind::labels().join(", ")
        )
    })?;

    let credential = providers::build_credential(config)?;
    let inventory = providers::build_inventory(credential)?;

    let subscriptions = inventory.list_subscriptions().await?;
    let subscription_id = resolve_subscription_id(&subscriptions, subscription)?;

    let resources = inventory.list_resources(&subscription_id, group).await?;
    let names = filter_resource_names(&resources, kind.provider_type());
    print_names(&names, json, "該当するリソースがありません")
}

fn print_names(names: &[String], json: bool, empty_message: &str) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(names)?);
    } else if names.is_empty() {
        println!("{}", empty_message.dimmed());
    } else {
        for name in names {
            println!("{}", name);
        }
    }
    Ok(())
}
