mod config;
mod constants;
mod core_auth;
mod core_cli;
mod core_error;
mod core_ftpcommand;
mod core_listing;
mod core_network;
mod core_sandbox;
mod core_transfer;
mod helpers;
mod server;
mod session;

use crate::config::Config;
use crate::constants::DEFAULT_CONFIG_PATH;
use crate::core_cli::Cli;
use anyhow::Result;
use clap::Parser;
use colored::*;
use env_logger::{Builder, Env};
use log::info;
use std::io::Write;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize the logger with a custom format and colors
    let default_filter = if args.verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_filter))
        .format(|buf, record| {
            let timestamp = buf.timestamp().to_string();
            let level = match record.level() {
                log::Level::Error => record.level().to_string().red(),
                log::Level::Warn => record.level().to_string().yellow(),
                log::Level::Info => record.level().to_string().green(),
                log::Level::Debug => record.level().to_string().blue(),
                log::Level::Trace => record.level().to_string().white(),
            };
            writeln!(buf, "[{}] [{}] {}", timestamp, level, record.args())
        })
        .init();

    let mut config = load_config(&args)?;

    if let Some(root) = args.root {
        config.server.chroot_dir = root;
    }
    if let Some(port) = args.port {
        config.server.listen_port = port;
    }

    server::run(config).await
}

/// An explicit `--config` must load. The default path is optional.
fn load_config(args: &Cli) -> Result<Config> {
    match &args.config {
        Some(path) => Config::load_from_file(path),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                Config::load_from_file(default_path)
            } else {
                info!(
                    "No configuration at {}, using built-in defaults",
                    DEFAULT_CONFIG_PATH
                );
                Ok(Config::default())
            }
        }
    }
}
