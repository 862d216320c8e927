use crate::config::Config;
use crate::core_error::FtpError;
use crate::core_network::ControlWriter;
use crate::helpers::{send_error, send_response};
use crate::session::Session;
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the USER FTP command.
///
/// Any syntactically valid name is answered with 331. Whether the account
/// exists is only revealed by the PASS reply.
pub async fn handle_user_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    username: String,
) -> Result<(), std::io::Error> {
    if username.is_empty() {
        warn!("USER command received with no arguments");
        let e = FtpError::CommandSyntaxError("USER requires a user name".into());
        return send_error(&writer, &e).await;
    }

    let result = {
        let mut session = session.lock().await;
        let submitted = session.submit_user(&username);
        submitted.map(|_| session.is_anonymous())
    };

    match result {
        Ok(true) => {
            info!("Anonymous login initiated for username: {}", username);
            send_response(
                &writer,
                b"331 Anonymous login okay, send your complete email address as password.\r\n",
            )
            .await
        }
        Ok(false) => {
            info!("Username received: {}", username);
            send_response(&writer, b"331 User name okay, need password.\r\n").await
        }
        Err(e) => {
            warn!("USER {} rejected: {}", username, e);
            send_error(&writer, &e).await
        }
    }
}
