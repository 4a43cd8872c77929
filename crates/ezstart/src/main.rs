mod commands;
mod providers;
mod tui;

use clap::{Parser, Subcommand};
use colored::Colorize;
use ezstart_config::{AppConfig, AuthMode};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ezstart")]
#[command(about = "Azure のリソースを選んで、GitHub Actions をワンステップで起動。", long_about = None)]
struct Cli {
    /// 設定ファイルのパス（省略時は自動検索）
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Azure の認証方式を上書き (browser, device-code, azure-cli, token)
    #[arg(long, global = true)]
    auth: Option<AuthMode>,

    /// デバッグログを有効化
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// 対話フォームを起動（デフォルト）
    Ui,
    /// サブスクリプション一覧
    Subscriptions {
        /// JSON で出力
        #[arg(long)]
        json: bool,
    },
    /// リソースグループ一覧
    Groups {
        /// サブスクリプション名または ID
        #[arg(short, long)]
        subscription: String,
        /// JSON で出力
        #[arg(long)]
        json: bool,
    },
    /// 種別で絞り込んだリソース名一覧
    Resources {
        /// サブスクリプション名または ID
        #[arg(short, long)]
        subscription: String,
        /// リソースグループ名
        #[arg(short, long)]
        group: String,
        /// リソース種別 ("Web App", "Kubernetes Service")
        #[arg(short = 't', long = "type")]
        resource_type: String,
        /// JSON で出力
        #[arg(long)]
        json: bool,
    },
    /// フォームを使わずに Start を実行
    Start {
        /// サブスクリプション名または ID
        #[arg(short, long)]
        subscription: String,
        /// リソースグループ名
        #[arg(short, long)]
        group: String,
        /// リソース種別 ("Web App", "Kubernetes Service")
        #[arg(short = 't', long = "type")]
        resource_type: String,
        /// リソース名
        #[arg(short, long)]
        name: String,
    },
    /// リポジトリシークレットの操作
    #[command(subcommand)]
    Secret(SecretCommands),
    /// workflow_dispatch を直接送信
    Dispatch {
        /// workflow ファイル名（省略時は設定値）
        #[arg(short, long)]
        workflow: Option<String>,
        /// ブランチまたはタグ（省略時は設定値）
        #[arg(short = 'r', long = "ref")]
        git_ref: Option<String>,
        /// workflow の入力 (key=value、複数指定可)
        #[arg(short, long = "input", value_name = "KEY=VALUE")]
        inputs: Vec<String>,
    },
    /// 設定の確認
    #[command(subcommand)]
    Config(ConfigCommands),
    /// バージョン情報を表示
    Version,
}

#[derive(Subcommand)]
enum SecretCommands {
    /// シークレットを暗号化して登録
    Set {
        /// シークレット名
        name: String,
        /// 値
        value: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// 解決済みの設定を表示（トークンは伏せ字）
    Show,
    /// 設定ファイルの検索結果を表示
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Ui);

    init_logging(matches!(command, Commands::Ui), cli.verbose);

    // Versionコマンドは設定ファイル不要
    if matches!(command, Commands::Version) {
        println!("ezstart {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", "✗ 設定の読み込みに失敗しました".red().bold());
            eprintln!("  {:#}", e);
            std::process::exit(1);
        }
    };
    if let Some(auth) = cli.auth {
        config.azure.auth = auth;
    }

    let result = match command {
        Commands::Ui => tui::run(&config).await,
        Commands::Subscriptions { json } => commands::list::subscriptions(&config, json).await,
        Commands::Groups { subscription, json } => {
            commands::list::groups(&config, &subscription, json).await
        }
        Commands::Resources {
            subscription,
            group,
            resource_type,
            json,
        } => commands::list::resources(&config, &subscription, &group, &resource_type, json).await,
        Commands::Start {
            subscription,
            group,
            resource_type,
            name,
        } => commands::start::handle(&config, &subscription, &group, &resource_type, &name).await,
        Commands::Secret(SecretCommands::Set { name, value }) => {
            commands::secret::set(&config, &name, &value).await
        }
        Commands::Dispatch {
            workflow,
            git_ref,
            inputs,
        } => commands::dispatch::handle(&config, workflow, git_ref, &inputs).await,
        Commands::Config(ConfigCommands::Show) => commands::config::show(&config),
        Commands::Config(ConfigCommands::Path) => commands::config::path(cli.config.as_deref()),
        Commands::Version => Ok(()),
    };

    if let Err(e) = result {
        eprintln!();
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
    Ok(())
}

/// 設定を読み込む。`--config` 指定時はそのファイルに環境変数を重ねる
fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => {
            let mut config = AppConfig::from_file(path)?;
            config.apply_env()?;
            config
        }
        None => AppConfig::load()?,
    };
    Ok(config)
}

/// ロギングを初期化
///
/// TUI は端末を占有するのでログはファイルへ、それ以外は stderr へ出力する。
fn init_logging(tui: bool, verbose: bool) {
    let default_level = match (tui, verbose) {
        (_, true) => "debug",
        (true, false) => "info",
        (false, false) => "warn",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if tui {
        if let Some(file) = open_log_file() {
            tracing_subscriber::fmt()
                .with_writer(file)
                .with_env_filter(filter)
                .with_ansi(false)
                .init();
        }
        return;
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn log_file_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("ezstart").join("ezstart.log"))
}

fn open_log_file() -> Option<std::fs::File> {
    let path = log_file_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok()?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .ok()
}
