use crate::config::Config;
use crate::core_error::FtpError;
use crate::core_listing::{format_long, format_names, Listing};
use crate::core_network::ControlWriter;
use crate::core_sandbox::resolve;
use crate::helpers::{send_error, send_response};
use crate::session::Session;
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Handles LIST: `ls -l` style lines over the data channel.
pub async fn handle_list_command(
    writer: ControlWriter,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    send_listing(writer, config, session, arg, true).await
}

/// Handles NLST: bare names over the data channel.
pub async fn handle_nlst_command(
    writer: ControlWriter,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    send_listing(writer, config, session, arg, false).await
}

/// `ls` flags clients commonly send with LIST/NLST.
const LS_FLAGS: &str = "aAdFhlLRrSt1";

fn is_ls_option(word: &str) -> bool {
    match word.strip_prefix('-') {
        Some(flags) => !flags.is_empty() && flags.chars().all(|c| LS_FLAGS.contains(c)),
        None => false,
    }
}

/// Drops `ls`-style flags (`-l`, `-la`) that many clients prepend. Anything
/// else starting with `-` is a file name.
fn listing_target(arg: &str) -> &str {
    let mut rest = arg.trim_start();
    loop {
        let word = rest.split(' ').next().unwrap_or("");
        if !is_ls_option(word) {
            break;
        }
        rest = rest[word.len()..].trim_start();
    }
    if rest.is_empty() {
        "."
    } else {
        rest
    }
}

async fn send_listing(
    writer: ControlWriter,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
    long: bool,
) -> Result<(), std::io::Error> {
    let target = listing_target(&arg);

    // The pending channel is used up by this command whatever the outcome.
    let (channel, resolved) = {
        let mut session = session.lock().await;
        let channel = session.data_channel.take();
        let resolved = resolve(&session.root, &session.cwd, target).await;
        (channel, resolved)
    };

    let resolved = match resolved {
        Ok(resolved) => resolved,
        Err(e) => {
            warn!("Listing of {} refused: {}", target, e);
            return send_error(&writer, &e).await;
        }
    };
    let channel = match channel {
        Some(channel) => channel,
        None => return send_error(&writer, &FtpError::NoDataConnection).await,
    };

    let entries = match Listing::new(resolved.clone()).entries().await {
        Ok(entries) => entries,
        Err(e) => {
            error!("Failed to read directory {:?}: {}", resolved.real, e);
            return send_error(&writer, &FtpError::Io(e)).await;
        }
    };
    let body = if long {
        format_long(&entries)
    } else {
        format_names(&entries)
    };

    send_response(&writer, b"150 Here comes the directory listing.\r\n").await?;

    let limit = Duration::from_secs(config.server.data_timeout_secs);
    let mut data_stream = match channel.open(limit).await {
        Ok(stream) => stream,
        Err(e) => {
            error!("Failed to open data connection: {}", e);
            return send_response(&writer, b"425 Can't open data connection.\r\n").await;
        }
    };

    let sent = async {
        data_stream.write_all(body.as_bytes()).await?;
        data_stream.shutdown().await
    }
    .await;

    match sent {
        Ok(()) => {
            info!(
                "Sent listing of {} ({} entries)",
                resolved.virtual_path,
                entries.len()
            );
            send_response(&writer, b"226 Directory send OK.\r\n").await
        }
        Err(e) => {
            error!("Failed to send listing: {}", e);
            send_response(&writer, b"426 Connection closed; transfer aborted.\r\n").await
        }
    }
}
