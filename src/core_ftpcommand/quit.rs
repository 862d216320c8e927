use crate::config::Config;
use crate::core_network::ControlWriter;
use crate::helpers::send_response;
use crate::session::Session;
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles QUIT. Any pending data channel is dropped and the connection loop
/// stops after this reply.
pub async fn handle_quit_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    {
        let mut session = session.lock().await;
        info!(
            "QUIT from {}",
            session.username.as_deref().unwrap_or("<no user>")
        );
        session.quit();
    }
    send_response(&writer, b"221 Goodbye.\r\n").await
}
