//! ydsync Daemon - Background synchronization service
//!
//! This binary mirrors one local directory into one Yandex Disk directory:
//! - Periodic synchronization passes on a fixed interval
//! - Single-pass mode for cron jobs and scripts (`--once`)
//! - Graceful shutdown on SIGTERM/SIGINT
//!
//! # Architecture
//!
//! The daemon loads and validates the configuration, installs the tracing
//! subscriber, wires the Yandex Disk adapter and the local directory adapter
//! into a `SyncEngine`, then enters a loop that runs one pass per tick. The
//! loop is controlled by a `CancellationToken` that is triggered on receipt
//! of SIGTERM or SIGINT; a running pass is allowed to finish.

mod logging;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use ydsync_core::config::Config;
use ydsync_disk::{client::DiskClient, provider::DiskStorageProvider};
use ydsync_sync::{engine::SyncEngine, filesystem::LocalDirectoryAdapter};

// ============================================================================
// Command line
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "ydsyncd",
    version,
    about = "Mirror a local directory to Yandex Disk"
)]
struct Args {
    /// Use alternate config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run a single synchronization pass and exit
    #[arg(long)]
    once: bool,
}

/// Loads the configuration file, applies environment overrides and
/// validates the result
///
/// An explicitly given file must exist; the default path may be absent.
fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut config = match explicit {
        Some(path) => Config::load(path)?,
        None => Config::load_if_exists(&Config::default_path())?,
    };

    let mut problems = config.apply_env_overrides();
    problems.extend(config.validate());

    if !problems.is_empty() {
        let details = problems
            .iter()
            .map(|p| format!("  - {p}"))
            .collect::<Vec<_>>()
            .join("\n");
        anyhow::bail!("Invalid configuration:\n{details}");
    }

    Ok(config)
}

// ============================================================================
// DaemonService
// ============================================================================

/// Main daemon service that drives synchronization passes
struct DaemonService {
    /// Validated application configuration
    config: Config,
    /// Engine wired to the Yandex Disk and local directory adapters
    engine: SyncEngine,
    /// Token for signalling graceful shutdown
    shutdown: CancellationToken,
}

impl DaemonService {
    /// Creates the adapters and the engine from `config`
    fn new(config: Config, shutdown: CancellationToken) -> Result<Self> {
        let client =
            DiskClient::from_config(&config.remote).context("Failed to create Yandex Disk client")?;
        let remote = Arc::new(DiskStorageProvider::new(client));
        let local = Arc::new(LocalDirectoryAdapter::new());

        let engine = SyncEngine::new(remote, local)
            .with_max_concurrent(config.sync.max_concurrent_transfers);

        Ok(Self {
            config,
            engine,
            shutdown,
        })
    }

    /// Runs exactly one pass
    ///
    /// Fails if the pass aborted or any file could not be synchronized.
    async fn run_once(&self) -> Result<()> {
        let root = self.config.sync.resolved_root();
        let result = self.engine.run(&root).await?;

        if !result.is_clean() {
            anyhow::bail!(
                "{} file(s) failed to synchronize:\n  {}",
                result.files_failed(),
                result.errors.join("\n  ")
            );
        }
        Ok(())
    }

    /// Main synchronization loop with periodic polling
    ///
    /// Uses `tokio::time::interval` based on `config.sync.poll_interval`.
    /// The first pass runs immediately. A pass that fails to list the remote
    /// directory is retried on the next tick; a missing tracked directory
    /// stops the daemon.
    async fn sync_loop(&self) -> Result<()> {
        let root = self.config.sync.resolved_root();
        let poll_duration = self.config.sync.poll_duration();

        info!(
            poll_interval_secs = self.config.sync.poll_interval,
            root = %root.display(),
            remote_dir = %self.config.remote.directory,
            "Starting sync loop"
        );

        let mut interval = tokio::time::interval(poll_duration);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    info!("Shutdown signal received");
                    break;
                }
                _ = interval.tick() => {}
            }

            match self.engine.run(&root).await {
                Ok(result) if !result.is_clean() => {
                    warn!(
                        failed = result.files_failed(),
                        "Some files were not synchronized, retrying next pass"
                    );
                }
                Ok(_) => {}
                Err(e) if e.is_fatal() => {
                    error!(error = %e, "Sync pass failed, stopping");
                    return Err(e.into());
                }
                Err(e) => {
                    error!(error = %e, "Sync pass failed, retrying next pass");
                }
            }
        }

        info!("Sync loop terminated");
        Ok(())
    }
}

// ============================================================================
// Graceful shutdown signal handler
// ============================================================================

/// Waits for SIGTERM or SIGINT and triggers the cancellation token
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C)");
        }
        _ = terminate => {
            info!("Received SIGTERM");
        }
    }

    token.cancel();
}

// ============================================================================
// Main entry point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    logging::init(&config.logging)?;

    info!(version = env!("CARGO_PKG_VERSION"), "ydsync daemon starting (ydsyncd)");

    let shutdown_token = CancellationToken::new();

    let signal_token = shutdown_token.clone();
    tokio::spawn(async move {
        shutdown_signal(signal_token).await;
    });

    let service = DaemonService::new(config, shutdown_token)?;
    service.engine.report_quota().await;

    let result = if args.once {
        service.run_once().await
    } else {
        service.sync_loop().await
    };

    match &result {
        Ok(()) => info!("ydsync daemon shut down gracefully"),
        Err(e) => error!(error = %e, "ydsync daemon exiting with error"),
    }

    result
}

// ============================================================================
// Tests
// ============================================================================
