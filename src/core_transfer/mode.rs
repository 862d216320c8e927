use crate::core_error::FtpError;
use std::fmt;

/// Representation type selected with TYPE.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransferType {
    #[default]
    Ascii,
    Binary,
}

impl TransferType {
    /// Parses the argument of a TYPE command.
    ///
    /// `A` and `A N` select ASCII, `I` and `L 8` select binary. Other type codes
    /// and format controls are rejected with a 504.
    pub fn from_type_arg(arg: &str) -> Result<TransferType, FtpError> {
        let upper = arg.to_ascii_uppercase();
        let parts: Vec<&str> = upper.split_whitespace().collect();

        match parts.as_slice() {
            [] => Err(FtpError::CommandSyntaxError("TYPE requires a type code".into())),
            ["A"] | ["A", "N"] => Ok(TransferType::Ascii),
            ["I"] | ["L", "8"] => Ok(TransferType::Binary),
            _ => Err(FtpError::ParameterNotImplemented(
                "Unsupported type-code. Only type A and I are allowed.".into(),
            )),
        }
    }
}

impl fmt::Display for TransferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferType::Ascii => write!(f, "ASCII"),
            TransferType::Binary => write!(f, "BINARY"),
        }
    }
}
