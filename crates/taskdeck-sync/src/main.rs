/*
[INPUT]:  CLI arguments, YAML configuration file, TASKDECK_* env
[OUTPUT]: One task action against the backend, rendered to the terminal
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or logging setup
*/

mod cli;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use taskdeck_adapter::TaskClient;
use taskdeck_sync::config::LogConfig;
use taskdeck_sync::{AppConfig, SelectionController, Synchronizer};

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let mut config = AppConfig::load(args.config_path.as_deref()).context("load config")?;
    if let Some(base_url) = args.base_url {
        config.gateway.base_url = base_url;
    }
    if let Some(level) = args.log_level {
        config.log.level = level;
    }
    let _log_guard = init_tracing(&config.log)?;

    info!(base_url = %config.gateway.base_url, "starting taskdeck");

    if matches!(args.command, Command::Config) {
        print!("{}", config.to_yaml().context("render config")?);
        return Ok(());
    }

    let client = TaskClient::with_config(config.client_config()).context("build http client")?;
    let sync = Arc::new(Synchronizer::new(client).with_execute_timeout(config.execute_timeout()));
    let mut controller = SelectionController::new(sync);

    cli::run(args.command, &mut controller).await
}

fn init_tracing(log: &LogConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(&log.level).context("invalid log level")?;
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr));

    match &log.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "taskdeck.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .try_init()
                .map_err(|err| anyhow!(err))
                .context("initialize tracing subscriber")?;
            Ok(Some(guard))
        }
        None => {
            registry
                .try_init()
                .map_err(|err| anyhow!(err))
                .context("initialize tracing subscriber")?;
            Ok(None)
        }
    }
}
