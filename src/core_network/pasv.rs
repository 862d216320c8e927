use crate::config::Config;
use crate::core_network::data::DataChannel;
use crate::core_network::ControlWriter;
use crate::helpers::send_response;
use crate::session::Session;
use log::{debug, error, info};
use std::io::{Error, ErrorKind};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// Handles PASV: opens a listener and announces it. The client's connection is
/// accepted by the next transfer command.
pub async fn handle_pasv_command(
    writer: ControlWriter,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    let local_ip = {
        let writer = writer.lock().await;
        writer.local_addr()?.ip()
    };

    let bind_ip = match to_ipv4(local_ip) {
        Some(ip) => ip,
        None => {
            error!("PASV requested on a non-IPv4 control connection: {}", local_ip);
            send_response(&writer, b"425 Can't open passive connection.\r\n").await?;
            return Ok(());
        }
    };

    let announce_ip = match config.server.pasv_address.as_deref() {
        Some(address) => match address.parse::<Ipv4Addr>() {
            Ok(ip) => ip,
            Err(e) => {
                error!("Invalid pasv_address {}: {}", address, e);
                bind_ip
            }
        },
        None => bind_ip,
    };

    match setup_pasv_listener(bind_ip, announce_ip).await {
        Ok((listener, pasv_response)) => {
            // A new PASV replaces whatever channel was pending.
            session.lock().await.data_channel = Some(DataChannel::Passive(listener));
            send_response(&writer, pasv_response.as_bytes()).await?;
            info!("PASV listener ready: {}", pasv_response.trim_end());
        }
        Err(e) => {
            error!("Failed to set up PASV listener: {}", e);
            send_response(&writer, b"425 Can't open passive connection.\r\n").await?;
        }
    }

    Ok(())
}

fn to_ipv4(ip: IpAddr) -> Option<Ipv4Addr> {
    match ip {
        IpAddr::V4(v4) => Some(v4),
        IpAddr::V6(v6) => v6.to_ipv4_mapped(),
    }
}

/// Sets up a passive mode (PASV) listener.
/// Returns the listener and the formatted PASV response.
pub async fn setup_pasv_listener(
    bind_ip: Ipv4Addr,
    announce_ip: Ipv4Addr,
) -> Result<(TcpListener, String), Error> {
    let listener = TcpListener::bind((bind_ip, 0)).await?;
    let addr = listener.local_addr()?;
    if addr.port() == 0 {
        return Err(Error::new(ErrorKind::AddrNotAvailable, "No port assigned"));
    }

    let pasv_response = format_pasv_response(announce_ip, addr.port());
    debug!(
        "PASV listener set up on IP: {}, Port: {}",
        bind_ip,
        addr.port()
    );
    Ok((listener, pasv_response))
}

pub fn format_pasv_response(ip: Ipv4Addr, port: u16) -> String {
    let [a, b, c, d] = ip.octets();
    format!(
        "227 Entering Passive Mode ({},{},{},{},{},{}).\r\n",
        a,
        b,
        c,
        d,
        port >> 8,
        port & 0xff
    )
}
