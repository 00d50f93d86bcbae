//! Tracing subscriber setup
//!
//! Installs a registry with up to three sinks:
//! - stdout, filtered by `RUST_LOG` or `logging.level`
//! - the optional info log file, receiving INFO and above
//! - the optional error log file, receiving ERROR only
//!
//! File sinks never use ANSI colors. Rotation is left to the host
//! (logrotate, journald).

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};
use ydsync_core::config::{expand_tilde, LogFormat, LoggingConfig};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Installs the global subscriber described by `config`
///
/// # Errors
/// Returns an error if a log file cannot be opened or a subscriber is
/// already installed
pub fn init(config: &LoggingConfig) -> Result<()> {
    tracing_subscriber::registry()
        .with(build_layers(config)?)
        .try_init()
        .context("Failed to install tracing subscriber")?;
    Ok(())
}

/// Builds every configured sink
pub fn build_layers(config: &LoggingConfig) -> Result<Vec<BoxedLayer>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let mut layers = vec![sink(std::io::stdout, config.format, true)
        .with_filter(env_filter)
        .boxed()];

    if let Some(path) = &config.info_file {
        let file = open_log_file(&expand_tilde(path))?;
        layers.push(
            sink(Mutex::new(file), config.format, false)
                .with_filter(LevelFilter::INFO)
                .boxed(),
        );
    }

    if let Some(path) = &config.error_file {
        let file = open_log_file(&expand_tilde(path))?;
        layers.push(
            sink(Mutex::new(file), config.format, false)
                .with_filter(LevelFilter::ERROR)
                .boxed(),
        );
    }

    Ok(layers)
}

fn sink<W>(writer: W, format: LogFormat, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true);

    match format {
        LogFormat::Text => layer.boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

/// Opens a log file for appending, creating it and its parent directories
pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}
