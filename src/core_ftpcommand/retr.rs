use crate::config::Config;
use crate::core_error::FtpError;
use crate::core_network::ControlWriter;
use crate::core_sandbox::resolve_file;
use crate::core_transfer::{send_stream, TransferError};
use crate::helpers::{send_error, send_response};
use crate::session::Session;
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Handles the RETR (Retrieve) FTP command.
///
/// The file is resolved inside the sandbox, then streamed over the pending
/// data channel in the session's current TYPE. The 226 is only sent once the
/// data channel has been flushed and closed.
pub async fn handle_retr_command(
    writer: ControlWriter,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    if arg.is_empty() {
        warn!("RETR command received with no arguments");
        // Syntax errors leave a pending channel in place.
        let e = FtpError::CommandSyntaxError("RETR requires a file name".into());
        return send_error(&writer, &e).await;
    }

    let (channel, resolved, transfer_type) = {
        let mut session = session.lock().await;
        let channel = session.data_channel.take();
        let resolved = resolve_file(&session.root, &session.cwd, &arg).await;
        (channel, resolved, session.transfer_type)
    };

    let resolved = match resolved {
        Ok(resolved) => resolved,
        Err(e) => {
            warn!("RETR {} refused: {}", arg, e);
            return send_error(&writer, &e).await;
        }
    };
    let channel = match channel {
        Some(channel) => channel,
        None => return send_error(&writer, &FtpError::NoDataConnection).await,
    };

    let (mut file, size) = match open_source(&resolved.real).await {
        Ok(opened) => opened,
        Err(e) => {
            error!("Failed to open {:?}: {}", resolved.real, e);
            return send_error(&writer, &FtpError::Io(e)).await;
        }
    };

    let opening = format!(
        "150 Opening {} mode data connection for {} ({} bytes).\r\n",
        transfer_type, resolved.virtual_path, size
    );
    send_response(&writer, opening.as_bytes()).await?;

    let limit = Duration::from_secs(config.server.data_timeout_secs);
    let mut data_stream = match channel.open(limit).await {
        Ok(stream) => stream,
        Err(e) => {
            error!("Failed to open data connection: {}", e);
            return send_response(&writer, b"425 Can't open data connection.\r\n").await;
        }
    };

    let result = match send_stream(
        &mut file,
        &mut data_stream,
        transfer_type,
        config.server.download_buffer_size,
    )
    .await
    {
        Ok(sent) => data_stream
            .shutdown()
            .await
            .map(|_| sent)
            .map_err(TransferError::DataChannel),
        Err(e) => Err(e),
    };

    match result {
        Ok(sent) => {
            info!(
                "File transfer completed: {} ({} bytes, {})",
                resolved.virtual_path, sent, transfer_type
            );
            send_response(&writer, b"226 Transfer complete.\r\n").await
        }
        Err(e) => {
            error!("Transfer of {} failed: {}", resolved.virtual_path, e);
            send_response(&writer, e.to_ftp_response().as_bytes()).await
        }
    }
}

async fn open_source(path: &std::path::Path) -> Result<(File, u64), std::io::Error> {
    let file = File::open(path).await?;
    let size = file.metadata().await?.len();
    Ok((file, size))
}
