#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    USER,
    PASS,
    QUIT,
    PWD,
    CWD,
    CDUP,
    LIST,
    NLST,
    RETR,
    TYPE,
    MODE,
    STRU,
    SYST,
    NOOP,
    PORT,
    PASV,
}

impl FtpCommand {
    pub fn from_str(cmd: &str) -> Option<FtpCommand> {
        match cmd.to_ascii_uppercase().as_str() {
            "USER" => Some(FtpCommand::USER),
            "PASS" => Some(FtpCommand::PASS),
            "QUIT" => Some(FtpCommand::QUIT),
            "PWD" | "XPWD" => Some(FtpCommand::PWD),
            "CWD" | "XCWD" => Some(FtpCommand::CWD),
            "CDUP" | "XCUP" => Some(FtpCommand::CDUP),
            "LIST" => Some(FtpCommand::LIST),
            "NLST" => Some(FtpCommand::NLST),
            "RETR" => Some(FtpCommand::RETR),
            "TYPE" => Some(FtpCommand::TYPE),
            "MODE" => Some(FtpCommand::MODE),
            "STRU" => Some(FtpCommand::STRU),
            "SYST" => Some(FtpCommand::SYST),
            "NOOP" => Some(FtpCommand::NOOP),
            "PORT" => Some(FtpCommand::PORT),
            "PASV" => Some(FtpCommand::PASV),
            _ => None,
        }
    }

    /// Everything except the login commands and QUIT needs an authenticated session.
    pub fn requires_login(&self) -> bool {
        !matches!(self, FtpCommand::USER | FtpCommand::PASS | FtpCommand::QUIT)
    }
}
