use crate::config::Config;
use crate::core_network::ControlWriter;
use crate::helpers::send_response;
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

pub async fn handle_noop_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    _session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    send_response(&writer, b"200 NOOP ok.\r\n").await
}
