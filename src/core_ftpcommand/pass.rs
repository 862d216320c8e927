use crate::config::Config;
use crate::core_network::ControlWriter;
use crate::helpers::{send_error, send_response};
use crate::session::{PassOutcome, Session};
use log::warn;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the PASS FTP command. An empty password is a valid argument.
pub async fn handle_pass_command(
    writer: ControlWriter,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    password: String,
) -> Result<(), std::io::Error> {
    let outcome = session.lock().await.submit_pass(&config.auth, &password);

    match outcome {
        Ok(PassOutcome::LoggedIn) => {
            send_response(&writer, b"230 User logged in, proceed.\r\n").await
        }
        Ok(PassOutcome::AlreadyLoggedIn) => {
            send_response(&writer, b"230 Already logged in.\r\n").await
        }
        Err(e) => {
            warn!("Login failed: {}", e);
            send_error(&writer, &e).await
        }
    }
}
