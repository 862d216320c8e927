use crate::config::Config;
use crate::core_error::FtpError;
use crate::core_network::data::DataChannel;
use crate::core_network::ControlWriter;
use crate::helpers::{send_error, send_response};
use crate::session::Session;
use log::{info, warn};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Parses the `h1,h2,h3,h4,p1,p2` argument of PORT.
pub fn parse_port_arg(arg: &str) -> Result<SocketAddr, FtpError> {
    let parts: Vec<&str> = arg.split(',').map(str::trim).collect();
    if parts.len() != 6 {
        return Err(FtpError::CommandSyntaxError(format!("illegal PORT argument {:?}", arg)));
    }

    let mut bytes = [0u8; 6];
    for (byte, part) in bytes.iter_mut().zip(&parts) {
        *byte = part
            .parse::<u8>()
            .map_err(|_| FtpError::CommandSyntaxError(format!("illegal PORT argument {:?}", arg)))?;
    }

    let ip = Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3]);
    let port = (bytes[4] as u16) << 8 | bytes[5] as u16;
    if port == 0 {
        return Err(FtpError::CommandSyntaxError("PORT 0 is not usable".into()));
    }
    Ok(SocketAddr::new(IpAddr::V4(ip), port))
}

/// Handles the PORT (Active Mode) FTP command.
///
/// The address must belong to the client on the control connection; the
/// connection itself is made by the next transfer command.
pub async fn handle_port_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let addr = match parse_port_arg(&arg) {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Rejected PORT {}: {}", arg, e);
            send_error(&writer, &e).await?;
            return Ok(());
        }
    };

    let peer_ip = {
        let writer = writer.lock().await;
        writer.peer_addr()?.ip()
    };
    let same_host = match peer_ip {
        IpAddr::V4(v4) => v4 == addr.ip(),
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4) == Some(addr.ip()),
    };
    if !same_host {
        warn!("PORT address {} does not match client {}", addr, peer_ip);
        send_response(&writer, b"500 Illegal PORT command.\r\n").await?;
        return Ok(());
    }

    info!("Received PORT command with address: {}", addr);
    session.lock().await.data_channel = Some(DataChannel::Active(addr));
    send_response(&writer, b"200 PORT command successful.\r\n").await?;
    Ok(())
}
