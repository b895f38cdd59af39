//! fileferry sender entry point.
//!
//! Usage: `fileferry [CONFIG_PATH]` (default `fileferry.toml`).
//!
//! The configuration file is TOML:
//!
//! ```toml
//! workers = 2
//! receiver_host = "192.168.1.101"
//! receiver_port = 8080
//! folders = ["/data/videos_a", "/data/videos_b"]
//! ```

use anyhow::Context;
use fileferry_dispatch::{DispatchConfig, DispatchPool};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "fileferry.toml";

fn main() -> anyhow::Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting fileferry");

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.into());
    let config = load_config(&config_path)?;
    tracing::info!(
        config = %config_path,
        workers = config.workers,
        receiver = %config.receiver_addr(),
        folders = config.folders.len(),
        "configuration loaded"
    );

    // Build and run the tokio runtime.
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(config))?;

    tracing::info!("fileferry finished");
    Ok(())
}

fn load_config(path: &str) -> anyhow::Result<DispatchConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {path}"))?;
    let config: DispatchConfig =
        toml::from_str(&raw).with_context(|| format!("failed to parse config file {path}"))?;
    Ok(config)
}

async fn run(config: DispatchConfig) -> anyhow::Result<()> {
    let pool = DispatchPool::new(config).context("invalid configuration")?;
    let report = pool.dispatch().await;

    // Per-file outcomes were already logged by the workers; the run is
    // finished regardless of them.
    for worker in &report.workers {
        tracing::info!(
            folder = %worker.folder.display(),
            sent = worker.sent,
            skipped = worker.skipped,
            "worker summary"
        );
    }
    if report.timed_out {
        tracing::warn!("run hit the wait ceiling; some workers were abandoned");
    }

    Ok(())
}
