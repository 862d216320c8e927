use crate::config::{log_config, Config};
use crate::core_network::network;
use anyhow::Result;
use log::{error, info};
use std::sync::Arc;

/// Runs the FTP server with the provided configuration.
///
/// The sandbox root is canonicalized once here; every session shares it.
pub async fn run(config: Config) -> Result<()> {
    info!("Starting server with configuration:");
    log_config(&config);

    let root = config.root_dir()?;
    info!("Serving {}", root.display());

    if let Err(e) = network::start_server(Arc::new(config), root).await {
        error!("Server stopped: {:#}", e);
        return Err(e);
    }

    Ok(())
}
