// Error taxonomy shared by the sandbox, the session and the command handlers.
// None of these end a session: each one is rendered as a control-channel reply.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FtpError {
    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Authentication failed for user {0}")]
    AuthFailed(String),

    #[error("Cannot change user once logged in")]
    UserChangeDenied,

    #[error("Bad sequence of commands: {0}")]
    BadSequence(String),

    #[error("Path escapes the server root: {0}")]
    OutsideRoot(String),

    #[error("No such file or directory: {0}")]
    NotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Is a directory: {0}")]
    IsADirectory(String),

    #[error("Already in directory: {0}")]
    AlreadyCurrent(String),

    #[error("Syntax error in parameters or arguments: {0}")]
    CommandSyntaxError(String),

    #[error("Command not implemented: {0}")]
    CommandNotImplemented(String),

    #[error("Command not implemented for parameter: {0}")]
    ParameterNotImplemented(String),

    #[error("No data connection")]
    NoDataConnection,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FtpError {
    pub fn code(&self) -> u16 {
        match self {
            FtpError::NotLoggedIn | FtpError::AuthFailed(_) | FtpError::UserChangeDenied => 530,
            FtpError::BadSequence(_) => 503,
            FtpError::OutsideRoot(_)
            | FtpError::NotFound(_)
            | FtpError::NotADirectory(_)
            | FtpError::IsADirectory(_)
            | FtpError::AlreadyCurrent(_) => 550,
            FtpError::CommandSyntaxError(_) => 501,
            FtpError::CommandNotImplemented(_) => 502,
            FtpError::ParameterNotImplemented(_) => 504,
            FtpError::NoDataConnection => 425,
            FtpError::Io(_) => 451,
        }
    }

    /// Control-channel reply line, CRLF terminated.
    pub fn to_ftp_response(&self) -> String {
        let text = match self {
            FtpError::NotLoggedIn => "Please login with USER and PASS.".to_string(),
            FtpError::AuthFailed(_) => "Login incorrect.".to_string(),
            FtpError::UserChangeDenied => "Can't change user once logged in.".to_string(),
            FtpError::BadSequence(msg) => msg.clone(),
            FtpError::OutsideRoot(_) => "Directory not accessible.".to_string(),
            FtpError::NotFound(path) => format!("{}: No such file or directory.", path),
            FtpError::NotADirectory(path) => format!("{}: Not a directory.", path),
            FtpError::IsADirectory(path) => format!("{}: Is a directory.", path),
            FtpError::AlreadyCurrent(path) => format!("Already in {}.", path),
            FtpError::CommandSyntaxError(msg) => {
                format!("Syntax error in parameters or arguments: {}.", msg)
            }
            FtpError::CommandNotImplemented(verb) => format!("Command {} not implemented.", verb),
            FtpError::ParameterNotImplemented(msg) => msg.clone(),
            FtpError::NoDataConnection => "Use PASV or PORT first.".to_string(),
            FtpError::Io(_) => "Requested action aborted. Local error in processing.".to_string(),
        };
        format!("{} {}\r\n", self.code(), text)
    }
}
