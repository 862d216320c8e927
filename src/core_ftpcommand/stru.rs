use crate::config::Config;
use crate::core_error::FtpError;
use crate::core_network::ControlWriter;
use crate::helpers::{send_error, send_response};
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Only file structure is supported.
pub async fn handle_stru_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    _session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    match arg.to_ascii_uppercase().as_str() {
        "F" => send_response(&writer, b"200 Structure set to F.\r\n").await,
        "" => {
            let e = FtpError::CommandSyntaxError("STRU requires a structure code".into());
            send_error(&writer, &e).await
        }
        _ => {
            let e = FtpError::ParameterNotImplemented("Only file structure is supported.".into());
            send_error(&writer, &e).await
        }
    }
}
