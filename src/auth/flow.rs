//! Auth-mode flow: which step the auth surface shows and whether it is open.
//!
//! Transitions: `login <-> signup` by user action, `signup -> verify` after a
//! successful signup, `verify -> closed` once the account is active. A
//! successful login closes the surface. Mode changes never touch the session.

use crate::auth::{
    client::AuthClient,
    errors::AuthError,
    storage::Storage,
    types::{Credentials, SignupRequest},
};
use std::fmt;
use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
    Verify,
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Login => "login",
            Self::Signup => "signup",
            Self::Verify => "verify",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AuthFlow {
    mode: AuthMode,
    open: bool,
}

impl AuthFlow {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: AuthMode::Login,
            open: false,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> AuthMode {
        self.mode
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Opens the surface on `mode`; hosts open on login or signup, and on
    /// verify when resuming a pending signup.
    pub fn open(&mut self, mode: AuthMode) {
        debug!(%mode, "auth flow opened");
        self.mode = mode;
        self.open = true;
    }

    pub fn close(&mut self) {
        debug!(mode = %self.mode, "auth flow closed");
        self.open = false;
    }

    /// User-initiated switch between login and signup.
    ///
    /// # Errors
    /// Returns `AuthError::InvalidTransition` for anything other than
    /// `login <-> signup`; verify is only reached through a signup.
    pub fn switch_mode(&mut self, to: AuthMode) -> Result<(), AuthError> {
        match (self.mode, to) {
            (AuthMode::Login | AuthMode::Signup, AuthMode::Login | AuthMode::Signup) => {
                self.mode = to;
                Ok(())
            }
            (from, to) => Err(AuthError::InvalidTransition { from, to }),
        }
    }

    /// Logs in and closes the flow on success.
    ///
    /// # Errors
    /// Returns `AuthError::InvalidTransition` outside login mode, otherwise
    /// whatever `AuthClient::login` returns; the flow stays open on failure.
    pub async fn submit_login<S: Storage>(
        &mut self,
        client: &mut AuthClient<S>,
        credentials: &Credentials,
    ) -> Result<(), AuthError> {
        self.expect_mode(AuthMode::Login)?;
        client.login(credentials).await?;
        self.close();
        Ok(())
    }

    /// Registers and moves to verify on success.
    ///
    /// # Errors
    /// Returns `AuthError::InvalidTransition` outside signup mode, otherwise
    /// whatever `AuthClient::signup` returns; the mode is unchanged on failure.
    pub async fn submit_signup<S: Storage>(
        &mut self,
        client: &mut AuthClient<S>,
        request: &SignupRequest,
    ) -> Result<(), AuthError> {
        self.expect_mode(AuthMode::Signup)?;
        client.signup(request).await?;
        self.mode = AuthMode::Verify;
        Ok(())
    }

    /// The verify step's "Done": closes when the account is active, otherwise
    /// stays on verify. Returns the verification status.
    ///
    /// # Errors
    /// Returns `AuthError::InvalidTransition` outside verify mode, otherwise
    /// whatever `AuthClient::check_verified` returns.
    pub async fn confirm_verified<S: Storage>(
        &mut self,
        client: &AuthClient<S>,
    ) -> Result<bool, AuthError> {
        self.expect_mode(AuthMode::Verify)?;
        let verified = client.check_verified().await?;
        if verified {
            self.close();
        }
        Ok(verified)
    }

    fn expect_mode(&self, expected: AuthMode) -> Result<(), AuthError> {
        if self.mode == expected {
            Ok(())
        } else {
            Err(AuthError::InvalidTransition {
                from: self.mode,
                to: expected,
            })
        }
    }
}
