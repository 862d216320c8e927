use crate::config::Config;
use crate::constants::MAX_COMMAND_LINE;
use crate::core_ftpcommand::handlers::{dispatch, initialize_command_handlers, CommandHandlers};
use crate::core_ftpcommand::parser::parse_command_line;
use crate::core_network::ControlWriter;
use crate::helpers::{format_banner, send_response};
use crate::session::Session;
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Mutex, Semaphore};
use tokio::time::timeout;

/// Binds the control port and serves clients until the process stops.
pub async fn start_server(config: Arc<Config>, root: PathBuf) -> Result<()> {
    let address = format!("{}:{}", config.server.bind_address, config.server.listen_port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind control port {}", address))?;
    info!("Server listening on {}", address);

    serve(listener, config, root).await
}

/// Accept loop. Every connection gets its own `Session` rooted at `root`.
pub async fn serve(listener: TcpListener, config: Arc<Config>, root: PathBuf) -> Result<()> {
    let handlers = Arc::new(initialize_command_handlers());
    let slots = Arc::new(Semaphore::new(config.server.max_clients));

    loop {
        let (mut socket, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Failed to accept connection: {}", e);
                continue;
            }
        };

        let permit = match Arc::clone(&slots).try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                warn!("Refusing {}: client limit reached", addr);
                tokio::spawn(async move {
                    let _ = socket
                        .write_all(b"421 Too many connections. Try again later.\r\n")
                        .await;
                    let _ = socket.shutdown().await;
                });
                continue;
            }
        };

        info!("New connection from {}", addr);
        let config = Arc::clone(&config);
        let handlers = Arc::clone(&handlers);
        let session = Arc::new(Mutex::new(Session::new(root.clone())));

        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, addr, config, handlers, session).await {
                error!("Connection error for {}: {:?}", addr, e);
            }
            info!("Connection closed for {}", addr);
            drop(permit);
        });
    }
}

pub async fn handle_connection(
    socket: TcpStream,
    addr: SocketAddr,
    config: Arc<Config>,
    handlers: Arc<CommandHandlers>,
    session: Arc<Mutex<Session>>,
) -> Result<()> {
    let (read_half, write_half) = socket.into_split();
    let writer: ControlWriter = Arc::new(Mutex::new(write_half));
    let mut reader = BufReader::new(read_half);

    send_response(&writer, format_banner(&config.server.banner).as_bytes()).await?;

    let idle = Duration::from_secs(config.server.idle_timeout_secs);
    let mut buffer = Vec::new();

    loop {
        let read = match timeout(idle, read_control_line(&mut reader, &mut buffer)).await {
            Ok(read) => read?,
            Err(_) => {
                info!("Idle timeout for {}", addr);
                send_response(&writer, b"421 Timeout.\r\n").await?;
                break;
            }
        };
        match read {
            ControlLine::Line => {}
            ControlLine::Eof => {
                debug!("Client {} disconnected", addr);
                break;
            }
            ControlLine::TooLong => {
                warn!("Discarded oversized command line from {}", addr);
                send_response(&writer, b"500 Command line too long.\r\n").await?;
                continue;
            }
        }

        let line = String::from_utf8_lossy(&buffer);
        let command = match parse_command_line(&line) {
            Some(command) => command,
            None => continue,
        };
        if command.verb == "PASS" {
            info!("Received command from {}: PASS ****", addr);
        } else {
            info!("Received command from {}: {}", addr, line.trim_end());
        }

        dispatch(&handlers, command, &writer, &config, &session).await?;

        if session.lock().await.closing {
            break;
        }
    }

    let mut writer = writer.lock().await;
    let _ = writer.shutdown().await;
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum ControlLine {
    Line,
    Eof,
    TooLong,
}

/// Reads one command line into `buffer`, never holding more than
/// `MAX_COMMAND_LINE` bytes. The rest of an oversized line is read and dropped.
async fn read_control_line<R>(reader: &mut R, buffer: &mut Vec<u8>) -> std::io::Result<ControlLine>
where
    R: AsyncBufRead + Unpin,
{
    buffer.clear();
    let limit = MAX_COMMAND_LINE as u64;
    let n = (&mut *reader).take(limit).read_until(b'\n', buffer).await?;
    if n == 0 {
        return Ok(ControlLine::Eof);
    }
    if buffer.last() == Some(&b'\n') || n < MAX_COMMAND_LINE {
        return Ok(ControlLine::Line);
    }

    loop {
        buffer.clear();
        let n = (&mut *reader).take(limit).read_until(b'\n', buffer).await?;
        if n == 0 || buffer.last() == Some(&b'\n') {
            break;
        }
    }
    buffer.clear();
    Ok(ControlLine::TooLong)
}
