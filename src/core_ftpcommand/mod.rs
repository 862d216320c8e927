// Here's the list of the FTP commands implemented
pub mod cdup;
pub mod cwd;
pub mod list;
pub mod mode;
pub mod noop;
pub mod pass;
pub mod pwd;
pub mod quit;
pub mod retr;
pub mod stru;
pub mod syst;
pub mod type_;
pub mod user;

// Parsing and dispatch
pub mod ftpcommand;
pub mod handlers;
pub mod parser;
