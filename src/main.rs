use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use price_watcher::bot_check::check_bot;
use price_watcher::config::LoggingConfig;
use price_watcher::credentials::TelegramCredentials;
use price_watcher::plugins::notifiers::TelegramClient;
use price_watcher::{watcher, AppConfig};

#[derive(Parser)]
#[command(name = "price-watcher", version, about = "Watch product prices and alert on Telegram")]
struct Cli {
    /// Extra configuration file, layered over config/default and config/local
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Check every tracked item once (default)
    Run(RunArgs),
    /// Verify a bot token and optionally send a test message
    CheckBot {
        /// Bot token; falls back to TELEGRAM_BOT_TOKEN
        token: Option<String>,
        /// Destination chat; falls back to TELEGRAM_CHAT_ID
        chat_id: Option<String>,
    },
}

#[derive(Args, Default)]
struct RunArgs {
    #[arg(long)]
    items: Option<PathBuf>,
    #[arg(long)]
    state: Option<PathBuf>,
    #[arg(long)]
    results: Option<PathBuf>,
    #[arg(long)]
    workers: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let _guard = init_tracing(&config.logging)?;

    match cli.command.unwrap_or(Command::Run(RunArgs::default())) {
        Command::Run(args) => {
            apply_run_args(&mut config, args)?;
            info!("Starting price watcher run");
            let totals = watcher::run(&config, TelegramCredentials::from_env()).await?;
            println!(
                "Checked {} items: {} prices found, {} notifications sent, {} errors",
                totals.checked, totals.prices_found, totals.notified, totals.errors
            );
        }
        Command::CheckBot { token, chat_id } => {
            let api = TelegramClient::new(
                &config.telegram.api_base,
                Duration::from_secs(config.telegram.request_timeout),
            )?;
            let mut stdout = std::io::stdout();
            check_bot(&api, token, chat_id, &mut stdout).await?;
        }
    }

    Ok(())
}

fn apply_run_args(config: &mut AppConfig, args: RunArgs) -> Result<()> {
    if let Some(items) = args.items {
        config.watcher.items_file = items;
    }
    if let Some(state) = args.state {
        config.watcher.state_file = state;
    }
    if let Some(results) = args.results {
        config.watcher.results_file = results;
    }
    if let Some(workers) = args.workers {
        config.watcher.workers = workers;
    }
    config.validate().context("Invalid command-line overrides")?;
    Ok(())
}

/// Console logging, plus a daily file when `log_dir` is set. The returned
/// guard flushes the file writer and must live until exit.
fn init_tracing(logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&logging.level))?;
    let console = fmt::layer().with_target(false);

    let Some(dir) = &logging.log_dir else {
        tracing_subscriber::registry().with(filter).with(console).init();
        return Ok(None);
    };

    let appender = tracing_appender::rolling::daily(dir, "price-watcher.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();

    Ok(Some(guard))
}
