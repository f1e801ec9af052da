//! Serve command handler

use anyhow::{Context, Result};

use chatstats::server::{self, ServerOptions};
use chatstats::Config;

/// Start the HTTP upload endpoint, applying command-line overrides.
#[cfg(not(tarpaulin_include))]
pub fn handle(bind: Option<String>, max_upload_mb: Option<u64>, timeout: Option<u64>) -> Result<()> {
    let config = apply_overrides(Config::load()?, bind, max_upload_mb, timeout)?;
    let options = ServerOptions::from_config(&config);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(server::serve(&config.server.bind, options))
}

/// Overlay command-line values on the loaded configuration.
pub fn apply_overrides(
    mut config: Config,
    bind: Option<String>,
    max_upload_mb: Option<u64>,
    timeout: Option<u64>,
) -> Result<Config> {
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    if let Some(mb) = max_upload_mb {
        config.server.max_upload_mb = mb;
    }
    if let Some(secs) = timeout {
        config.server.timeout_secs = secs;
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid option: {}", e))?;
    Ok(config)
}
