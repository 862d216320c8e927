use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "sandftpd", about = "A read-only, single-rooted FTP server.")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory served as "/", overrides `chroot_dir`
    #[arg(short, long)]
    pub root: Option<String>,

    /// Control port, overrides `listen_port`
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}
