//! qorjob - identifiable job queue on top of the system scheduler table
//!
//! Main entry point for the qorjob CLI and its detached workers.

mod adapters;
mod cli;
mod cmd_job;

use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser};
use tracing::warn;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use qorjob_config::{default_config_path, Config, ConfigLoader, ConfigValidator, LoggingConfig};
use qorjob_cron::CronStore;

use crate::cli::Cli;
use crate::cmd_job::{handle_job_command, run_worker};

/// Initialize tracing.
///
/// Console output goes to stderr. When a log directory is configured, logs are
/// also written there with daily rotation.
fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))?;

    let file_layer = match logging.dir_path() {
        Some(log_dir) => {
            std::fs::create_dir_all(&log_dir)?;

            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("qorjob")
                .filename_suffix("log")
                .max_log_files(logging.max_files)
                .build(&log_dir)?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // The guard flushes buffered lines on drop, so it lives as long as the process.
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    Ok(())
}

/// Load the configuration named on the command line, or the default one.
fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => ConfigLoader::load(path)?,
        None => ConfigLoader::load_or_default(&default_config_path())?,
    };
    Ok(config)
}

/// Build the store, forwarding an explicit config path to spawned workers.
fn build_store(config: &Config, config_path: Option<&Path>) -> CronStore {
    let mut worker = config.worker.clone();
    if let Some(path) = config_path {
        let path = std::fs::canonicalize(path).unwrap_or_else(|_| PathBuf::from(path));
        worker.args.push("--config".to_string());
        worker.args.push(path.display().to_string());
    }
    CronStore::from_config(&config.crontab, worker)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.logging)?;

    for warning in ConfigValidator::validate(&config).into_result()? {
        warn!("Config {}: {}", warning.path, warning.message);
    }

    let store = build_store(&config, cli.config.as_deref());

    if let Some(job_id) = cli.qor_job {
        return run_worker(&store, &config, &job_id);
    }

    match cli.command {
        Some(command) => handle_job_command(command, &store, &config),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}
