use crate::config::Config;
use crate::core_error::FtpError;
use crate::core_network::ControlWriter;
use crate::helpers::{send_error, send_response};
use crate::session::Session;
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the CWD (Change Working Directory) FTP command.
///
/// The target goes through the sandbox first; on any failure the working
/// directory is left as it was and a 550 is sent.
pub async fn handle_cwd_command(
    writer: ControlWriter,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    if arg.is_empty() {
        warn!("CWD command received with no arguments");
        let e = FtpError::CommandSyntaxError("CWD requires a directory".into());
        return send_error(&writer, &e).await;
    }

    let result = {
        let mut session = session.lock().await;
        let changed = session
            .change_dir(&arg, config.server.reject_current_dir)
            .await;
        changed.map(|_| session.cwd.to_string())
    };

    match result {
        Ok(cwd) => {
            info!("Changed directory to: {}", cwd);
            send_response(&writer, b"250 Directory successfully changed.\r\n").await
        }
        Err(e) => {
            warn!("CWD {} failed: {}", arg, e);
            send_error(&writer, &e).await
        }
    }
}
