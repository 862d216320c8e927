pub mod helper;

pub use helper::{authenticate, is_anonymous, validate_username};
