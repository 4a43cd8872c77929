use colored::Colorize;
use ezstart_config::{AppConfig, find_config_file};
use std::path::Path;

pub fn show(config: &AppConfig) -> anyhow::Result<()> {
    print!("{}", config.redacted().to_yaml()?);

    if let Err(e) = config.validate() {
        eprintln!();
        eprintln!("{} {}", "⚠".yellow(), e);
    }
    Ok(())
}

pub fn path(explicit: Option<&Path>) -> anyhow::Result<()> {
    let found = explicit.map(Path::to_path_buf).or_else(find_config_file);
    match found {
        Some(path) => println!("{}", path.display()),
        None => println!("{}", "設定ファイルは見つかりませんでした（デフォルト値と環境変数を使用）".dimmed()),
    }
    Ok(())
}
