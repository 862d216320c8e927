use log::debug;
use std::io::{Error, ErrorKind};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

/// A data channel announced by PASV or PORT and not yet opened.
///
/// The connection is only made when the transfer command runs: a passive
/// listener is accepted from, an active address is connected to.
#[derive(Debug)]
pub enum DataChannel {
    Passive(TcpListener),
    Active(SocketAddr),
}

impl DataChannel {
    pub async fn open(self, limit: Duration) -> Result<TcpStream, Error> {
        match self {
            DataChannel::Passive(listener) => {
                let (stream, addr) = timeout(limit, listener.accept())
                    .await
                    .map_err(|_| Error::new(ErrorKind::TimedOut, "No data connection from client"))??;
                debug!("Accepted data connection from: {}", addr);
                Ok(stream)
            }
            DataChannel::Active(addr) => {
                let stream = timeout(limit, TcpStream::connect(addr))
                    .await
                    .map_err(|_| Error::new(ErrorKind::TimedOut, "Timed out connecting to client"))??;
                debug!("Connected data channel to: {}", addr);
                Ok(stream)
            }
        }
    }
}
