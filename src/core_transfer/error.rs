// Errors raised while bytes are moving over an open data channel.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Failed to read source: {0}")]
    Source(std::io::Error),

    #[error("Data connection failed: {0}")]
    DataChannel(std::io::Error),
}

impl TransferError {
    pub fn to_ftp_response(&self) -> String {
        match self {
            TransferError::Source(_) => {
                "451 Requested action aborted. Local error in processing.\r\n".to_string()
            }
            TransferError::DataChannel(_) => "426 Connection closed; transfer aborted.\r\n".to_string(),
        }
    }
}
