pub mod data;
pub mod network;
pub mod pasv;
pub mod port;

#[cfg(test)]
mod test_network;

use std::sync::Arc;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

/// Write side of a control connection, shared with the command handlers.
pub type ControlWriter = Arc<Mutex<OwnedWriteHalf>>;
