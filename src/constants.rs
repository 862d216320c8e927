// src/constants.rs

pub const USERNAME_REGEX: &str = r"^[A-Za-z0-9._-]{1,32}$";
pub const ANONYMOUS_USERS: [&str; 2] = ["anonymous", "ftp"];
pub const DEFAULT_CONFIG_PATH: &str = "/etc/sandftpd.toml";
pub const DEFAULT_BANNER: &str = "sandftpd ready.";
pub const MAX_COMMAND_LINE: usize = 1024; // bytes, including CRLF
pub const MAX_VERB_IN_REPLY: usize = 16;
