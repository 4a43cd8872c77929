use crate::providers;
use colored::Colorize;
use ezstart_config::AppConfig;

pub async fn set(config: &AppConfig, name: &str, value: &str) -> anyhow::Result<()> {
    let github = providers::build_github(config)?;

    println!(
        "シークレット {} を {} に登録中...",
        name.cyan(),
        github.full_name().cyan()
    );
    github.put_secret(name, value).await?;
    println!("{}", "✓ 登録しました".green());
    Ok(())
}
