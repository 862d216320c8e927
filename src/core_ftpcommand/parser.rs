use crate::core_ftpcommand::ftpcommand::FtpCommand;

/// One control-channel line split into its verb and argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub verb: String,
    pub command: Option<FtpCommand>,
    pub arg: String,
}

/// Splits a raw line at the first space. The verb is upper-cased; the argument
/// keeps its case and inner spaces. Blank lines yield `None`.
pub fn parse_command_line(line: &str) -> Option<CommandLine> {
    let line = line.trim_end_matches(['\r', '\n']).trim_start();
    if line.trim().is_empty() {
        return None;
    }

    let mut parts = line.splitn(2, ' ');
    let verb = parts.next().unwrap_or_default().to_ascii_uppercase();
    let arg = parts.next().unwrap_or_default().trim().to_string();

    Some(CommandLine {
        command: FtpCommand::from_str(&verb),
        verb,
        arg,
    })
}
