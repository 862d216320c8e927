use crate::config::AuthConfig;
use crate::constants::{ANONYMOUS_USERS, USERNAME_REGEX};
use crate::core_error::FtpError;
use bcrypt::verify;
use log::{info, warn};
use regex::Regex;
use std::sync::OnceLock;

fn username_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(USERNAME_REGEX).expect("USERNAME_REGEX is a valid pattern"))
}

pub fn validate_username(username: &str) -> Result<(), FtpError> {
    if username_regex().is_match(username) {
        Ok(())
    } else {
        Err(FtpError::CommandSyntaxError(format!(
            "invalid user name {:?}",
            username
        )))
    }
}

pub fn is_anonymous(username: &str) -> bool {
    ANONYMOUS_USERS
        .iter()
        .any(|anonymous| anonymous.eq_ignore_ascii_case(username))
}

pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    verify(password, hashed_password).unwrap_or(false)
}

/// Checks a USER/PASS pair against the single configured account.
///
/// Anonymous identities pass when `allow_anonymous` is set, whatever the
/// password. The named account needs a matching bcrypt hash, unless no hash
/// is configured, in which case any password is accepted.
pub fn authenticate(auth: &AuthConfig, username: &str, password: &str) -> Result<(), FtpError> {
    if is_anonymous(username) {
        if auth.allow_anonymous {
            info!("Anonymous login accepted for {}", username);
            return Ok(());
        }
        warn!("Anonymous login refused for {}", username);
        return Err(FtpError::AuthFailed(username.to_string()));
    }

    if username != auth.username {
        warn!("Unknown user {}", username);
        return Err(FtpError::AuthFailed(username.to_string()));
    }

    match &auth.password_hash {
        None => Ok(()),
        Some(hash) if verify_password(password, hash) => Ok(()),
        Some(_) => {
            warn!("Invalid password for user {}", username);
            Err(FtpError::AuthFailed(username.to_string()))
        }
    }
}
