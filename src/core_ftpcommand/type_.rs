use crate::config::Config;
use crate::core_network::ControlWriter;
use crate::core_transfer::TransferType;
use crate::helpers::{send_error, send_response};
use crate::session::Session;
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the TYPE FTP command.
///
/// `A` (optionally `A N`) selects ASCII and `I` (or `L 8`) selects binary.
/// The choice applies to every later RETR on this session.
pub async fn handle_type_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    match TransferType::from_type_arg(&arg) {
        Ok(transfer_type) => {
            session.lock().await.transfer_type = transfer_type;
            info!("Transfer type set to {}", transfer_type);
            let response = match transfer_type {
                TransferType::Ascii => "200 Type set to A.\r\n",
                TransferType::Binary => "200 Type set to I.\r\n",
            };
            send_response(&writer, response.as_bytes()).await
        }
        Err(e) => {
            warn!("TYPE {} rejected: {}", arg, e);
            send_error(&writer, &e).await
        }
    }
}
