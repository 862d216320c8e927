use crate::config::Config;
use crate::core_network::ControlWriter;
use crate::helpers::{quote_path, send_response};
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Replies with the virtual working directory. The real root is never shown.
pub async fn handle_pwd_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    let cwd = session.lock().await.cwd.to_string();
    let response = format!("257 {} is the current directory.\r\n", quote_path(&cwd));
    send_response(&writer, response.as_bytes()).await
}
