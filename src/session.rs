use crate::config::AuthConfig;
use crate::core_auth::{authenticate, is_anonymous, validate_username};
use crate::core_error::FtpError;
use crate::core_network::data::DataChannel;
use crate::core_sandbox::{resolve_dir, VirtualPath};
use crate::core_transfer::TransferType;
use log::info;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    AwaitingUser,
    AwaitingPass,
    LoggedIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    LoggedIn,
    AlreadyLoggedIn,
}

/// Per-connection state. One is created for every accepted control connection
/// and handed to each command handler; sessions never share one.
#[derive(Debug)]
pub struct Session {
    pub root: PathBuf, // canonical, fixed for the lifetime of the session
    pub cwd: VirtualPath,
    pub username: Option<String>,
    pub state: AuthState,
    pub transfer_type: TransferType,
    pub data_channel: Option<DataChannel>,
    pub closing: bool,
}

impl Session {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            cwd: VirtualPath::root(),
            username: None,
            state: AuthState::AwaitingUser,
            transfer_type: TransferType::default(), // Default transfer type is ASCII
            data_channel: None,
            closing: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::LoggedIn
    }

    pub fn require_login(&self) -> Result<(), FtpError> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(FtpError::NotLoggedIn)
        }
    }

    /// Records the identity for the following PASS. The reply never tells the
    /// client whether the account exists; that is decided at PASS.
    pub fn submit_user(&mut self, username: &str) -> Result<(), FtpError> {
        if self.is_authenticated() {
            return Err(FtpError::UserChangeDenied);
        }
        validate_username(username)?;

        self.username = Some(username.to_string());
        self.state = AuthState::AwaitingPass;
        Ok(())
    }

    pub fn submit_pass(&mut self, auth: &AuthConfig, password: &str) -> Result<PassOutcome, FtpError> {
        match self.state {
            AuthState::LoggedIn => return Ok(PassOutcome::AlreadyLoggedIn),
            AuthState::AwaitingUser => {
                return Err(FtpError::BadSequence("Login with USER first.".into()))
            }
            AuthState::AwaitingPass => {}
        }

        let username = self.username.clone().unwrap_or_default();
        if let Err(e) = authenticate(auth, &username, password) {
            self.state = AuthState::AwaitingUser;
            self.username = None;
            return Err(e);
        }

        self.state = AuthState::LoggedIn;
        self.cwd = VirtualPath::root();
        info!("User {} logged in", username);
        Ok(PassOutcome::LoggedIn)
    }

    pub fn is_anonymous(&self) -> bool {
        self.username.as_deref().map(is_anonymous).unwrap_or(false)
    }

    /// Moves the working directory. `cwd` is replaced only once the target has
    /// been normalized, found on disk and verified as a directory inside the root.
    ///
    /// With `reject_current` set, a target equal to the current directory fails
    /// with `AlreadyCurrent`. The bare root alias (`/`) is always accepted.
    pub async fn change_dir(&mut self, requested: &str, reject_current: bool) -> Result<(), FtpError> {
        let target = self.cwd.join(requested)?;

        let root_alias = requested.chars().all(|c| c == '/');
        if reject_current && !root_alias && target == self.cwd {
            return Err(FtpError::AlreadyCurrent(target.to_string()));
        }

        let resolved = resolve_dir(&self.root, &self.cwd, requested).await?;
        self.cwd = resolved.virtual_path;
        Ok(())
    }

    pub async fn change_to_parent(&mut self, reject_current: bool) -> Result<(), FtpError> {
        self.change_dir("..", reject_current).await
    }

    /// Hands the pending data channel to the current command. Each channel
    /// serves exactly one transfer.
    pub fn take_data_channel(&mut self) -> Result<DataChannel, FtpError> {
        self.data_channel.take().ok_or(FtpError::NoDataConnection)
    }

    pub fn quit(&mut self) {
        self.data_channel = None;
        self.closing = true;
    }
}
