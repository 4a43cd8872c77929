//! フォームと同じステートマシンでの非対話 Start

use super::selectable_subscription_name;
use crate::providers;
use colored::Colorize;
use ezstart_config::AppConfig;
use ezstart_core::{Event, ResourceKind, Session, SubmitTask, TaskStatus};

pub async fn handle(
    config: &AppConfig,
    subscription: &str,
    group: &str,
    resource_type: &str,
    name: &str,
) -> anyhow::Result<()> {
    if ResourceKind::from_label(resource_type).is_none() {
        anyhow::bail!(
            "不明なリソース種別です: {} (利用可能: {})",
            resource_type,
            ResourceKind::labels().join(", ")
        );
    }

    let credential = providers::build_credential(config)?;
    let inventory = providers::build_inventory(credential)?;
    let automation = providers::build_automation(config)?;
    let mut session = Session::new(inventory, automation, config.submit_settings());

    println!("{}", "サブスクリプションを取得中...".blue());
    session.dispatch(Event::Mounted);
    session.settle().await;

    let subscription_name =
        selectable_subscription_name(session.selection().subscriptions(), subscription)?;
    session.dispatch(Event::SubscriptionSelected(subscription_name));
    session.settle().await;

    if !session
        .selection()
        .resource_group_options()
        .iter()
        .any(|g| g == group)
    {
        anyhow::bail!("リソースグループ '{}' が見つかりません", group);
    }

    println!("{}", "リソースを取得中...".blue());
    session.dispatch(Event::ResourceGroupSelected(group.to_string()));
    session.dispatch(Event::ResourceTypeSelected(resource_type.to_string()));
    session.settle().await;

    if !session
        .selection()
        .resource_name_options()
        .iter()
        .any(|n| n == name)
    {
        anyhow::bail!(
            "{} '{}' がリソースグループ '{}' に見つかりません",
            resource_type,
            name,
            group
        );
    }
    session.dispatch(Event::ResourceNameSelected(name.to_string()));

    session.dispatch(Event::StartRequested);
    if let Some(banner) = session.selection().banner() {
        println!("{}", banner.green());
    }
    session.settle().await;

    let Some(submission) = session.selection().submission() else {
        anyhow::bail!("送信されませんでした");
    };

    println!();
    for task in [SubmitTask::Secret, SubmitTask::Workflow] {
        match submission.status(task) {
            TaskStatus::Succeeded => println!("  {} {}", "✓".green(), task),
            TaskStatus::Failed(reason) => {
                println!("  {} {}: {}", "✗".red(), task, reason.red())
            }
            TaskStatus::Pending => println!("  {} {}", "…".yellow(), task),
        }
    }

    if !submission.is_success() {
        anyhow::bail!("一部のタスクが失敗しました");
    }
    Ok(())
}
