use crate::config::Config;
use crate::core_network::ControlWriter;
use crate::helpers::{send_error, send_response};
use crate::session::Session;
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles CDUP. Asking for the parent of the root fails and leaves the
/// session at the root.
pub async fn handle_cdup_command(
    writer: ControlWriter,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    let result = {
        let mut session = session.lock().await;
        let changed = session
            .change_to_parent(config.server.reject_current_dir)
            .await;
        changed.map(|_| session.cwd.to_string())
    };

    match result {
        Ok(cwd) => {
            info!("Changed directory up to: {}", cwd);
            send_response(&writer, b"250 Directory successfully changed.\r\n").await
        }
        Err(e) => {
            warn!("CDUP failed: {}", e);
            send_error(&writer, &e).await
        }
    }
}
