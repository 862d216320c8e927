use crate::config::Config;
use crate::core_error::FtpError;
use crate::core_network::ControlWriter;
use crate::helpers::{send_error, send_response};
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Only stream mode is supported.
pub async fn handle_mode_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    _session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    match arg.to_ascii_uppercase().as_str() {
        "S" => send_response(&writer, b"200 Mode set to S.\r\n").await,
        "" => {
            let e = FtpError::CommandSyntaxError("MODE requires a mode code".into());
            send_error(&writer, &e).await
        }
        _ => {
            let e = FtpError::ParameterNotImplemented("Only stream mode is supported.".into());
            send_error(&writer, &e).await
        }
    }
}
