#![forbid(unsafe_code)]

//! `waitline` — clinic waiting-queue notifier binary.
//!
//! Bootstraps configuration and the database, then drives the
//! outside-waiting notification sweep: either once (`--once`, the
//! manual trigger) or on a periodic timer until interrupted.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use waitline::config::GlobalConfig;
use waitline::notify::messenger::{Messenger, MockMessenger, TwilioMessenger};
use waitline::notify::{sweep, Notifier};
use waitline::persistence::db;
use waitline::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "waitline", about = "Clinic waiting-queue notifier", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "waitline.toml")]
    config: PathBuf,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Run a single notification sweep and exit.
    #[arg(long)]
    once: bool,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;
    info!("waitline bootstrap");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    let mut config = GlobalConfig::load_from_path(&args.config)?;
    config.load_credentials()?;
    info!("configuration loaded");

    let pool = Arc::new(db::connect(config.db_path()).await?);
    info!("database connected");

    let messenger: Arc<dyn Messenger> = if config.sms.enabled {
        Arc::new(TwilioMessenger::new(
            config.sms.account_sid.clone(),
            config.sms.auth_token.clone(),
            config.sms.from_number.clone(),
        ))
    } else {
        info!("sms disabled; using mock transport");
        Arc::new(MockMessenger::new())
    };

    let notifier = Arc::new(Notifier::new(
        pool,
        messenger,
        config.office.name.clone(),
        config.office.base_url.clone(),
    ));

    if args.once {
        let count = notifier.run_sweep().await?;
        info!(count, "manual sweep finished");
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let sweep_handle = sweep::spawn_sweep_task(
        Arc::clone(&notifier),
        Duration::from_secs(config.sweep_interval_seconds),
        cancel.clone(),
    );
    info!(
        interval_seconds = config.sweep_interval_seconds,
        "notification sweep started"
    );

    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(?err, "ctrl-c handler failed; shutting down");
    }
    info!("shutdown signal received");
    cancel.cancel();
    let _ = sweep_handle.await;

    Ok(())
}

fn init_tracing(format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder
            .try_init()
            .map_err(|err| AppError::Config(format!("tracing init failed: {err}")))?,
        LogFormat::Json => builder
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("tracing init failed: {err}")))?,
    }
    Ok(())
}
