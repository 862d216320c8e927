use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_port: u16,
    pub bind_address: String,
    pub pasv_address: Option<String>, // Public IPv4 for PASV replies, control address if unset
    pub chroot_dir: String,
    pub banner: String,
    pub max_clients: usize,
    pub idle_timeout_secs: u64,
    pub data_timeout_secs: u64,
    pub download_buffer_size: usize,
    pub reject_current_dir: bool, // CWD into the current directory is an error
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    pub username: String,
    pub password_hash: Option<String>, // bcrypt, any password is accepted if unset
    pub allow_anonymous: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_port: 2121,
            bind_address: String::from("0.0.0.0"),
            pasv_address: None,
            chroot_dir: String::from("."),
            banner: String::from(crate::constants::DEFAULT_BANNER),
            max_clients: 8,
            idle_timeout_secs: 300,
            data_timeout_secs: 60,
            download_buffer_size: 128 * 1024, // Default 128 KB
            reject_current_dir: true,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: String::from("ftpuser"),
            password_hash: None,
            allow_anonymous: true,
        }
    }
}

impl Config {
    pub fn from_toml(config_str: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(config_str).context("Failed to parse configuration")?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))
    }

    /// Canonical sandbox root. Fails if `chroot_dir` is missing or not a directory.
    pub fn root_dir(&self) -> Result<PathBuf> {
        let root = PathBuf::from(&self.server.chroot_dir)
            .canonicalize()
            .with_context(|| format!("Root directory does not exist: {}", self.server.chroot_dir))?;
        if !root.is_dir() {
            anyhow::bail!("Root is not a directory: {}", root.display());
        }
        Ok(root)
    }
}

// Helper function to log configuration options
pub fn log_config(config: &Config) {
    info!("  Listen Address: {}:{}", config.server.bind_address, config.server.listen_port);
    info!(
        "  PASV Address: {}",
        config.server.pasv_address.as_deref().unwrap_or("(control connection)")
    );
    info!("  Root Directory: {}", config.server.chroot_dir);
    info!("  Max Clients: {}", config.server.max_clients);
    info!("  Idle Timeout: {}s", config.server.idle_timeout_secs);
    info!("  Data Timeout: {}s", config.server.data_timeout_secs);
    info!(
        "  Download Buffer Size: {} KB",
        config.server.download_buffer_size / 1024
    );
    info!("  Reject CWD To Current Dir: {}", config.server.reject_current_dir);
    info!("  Account: {}", config.auth.username);
    info!("  Anonymous Login: {}", config.auth.allow_anonymous);
}
