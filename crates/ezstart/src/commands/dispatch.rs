use crate::providers;
use colored::Colorize;
use ezstart_config::AppConfig;
use std::collections::BTreeMap;

/// `key=value` 形式の入力をパース
pub fn parse_inputs(inputs: &[String]) -> anyhow::Result<BTreeMap<String, String>> {
    inputs
        .iter()
        .map(|input| {
            let (key, value) = input
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("KEY=VALUE 形式で指定してください: {}", input))?;
            if key.is_empty() {
                anyhow::bail!("入力名が空です: {}", input);
            }
            Ok((key.to_string(), value.to_string()))
        })
        .collect()
}

pub async fn handle(
    config: &AppConfig,
    workflow: Option<String>,
    git_ref: Option<String>,
    inputs: &[String],
) -> anyhow::Result<()> {
    let inputs = parse_inputs(inputs)?;
    let github = providers::build_github(config)?;

    let workflow = workflow.unwrap_or_else(|| config.github.workflow_file.clone());
    let git_ref = git_ref.unwrap_or_else(|| config.github.git_ref.clone());

    println!(
        "{} を {}@{} で起動中...",
        workflow.cyan(),
        github.full_name().cyan(),
        git_ref
    );
    github.create_dispatch(&workflow, &git_ref, &inputs).await?;
    println!("{}", "✓ workflow_dispatch を送信しました".green());
    Ok(())
}
