pub mod ascii;
pub mod error;
pub mod mode;
pub mod stream;

pub use error::TransferError;
pub use mode::TransferType;
pub use stream::send_stream;
