pub mod login;
pub mod password;
pub mod session;
pub mod signup;
pub mod verify;

use crate::auth::{Credentials, SignupRequest, User};
use crate::cli::globals::GlobalArgs;
use anyhow::Result;
use secrecy::SecretString;

#[derive(Debug)]
pub enum Action {
    Login {
        email: String,
        password: SecretString,
    },
    Signup(SignupRequest),
    Verify,
    Logout,
    Status,
    ForgotPassword {
        email: String,
    },
    ResetPassword {
        token: SecretString,
        password: SecretString,
        password_confirm: SecretString,
    },
    VerifyEmail {
        key: SecretString,
    },
}

impl Action {
    /// Runs the action against the configured API and session file.
    ///
    /// # Errors
    /// Returns the user-facing failure of the underlying auth operation.
    pub async fn execute(self, globals: &GlobalArgs) -> Result<()> {
        match self {
            Self::Login { email, password } => {
                login::handle(globals, &Credentials::new(email, password)).await
            }
            Self::Signup(request) => signup::handle(globals, &request).await,
            Self::Verify => verify::handle(globals).await,
            Self::Logout => session::logout(globals),
            Self::Status => session::status(globals),
            Self::ForgotPassword { email } => password::forgot(globals, &email).await,
            Self::ResetPassword {
                token,
                password,
                password_confirm,
            } => password::reset(globals, &token, &password, &password_confirm).await,
            Self::VerifyEmail { key } => verify::verify_email(globals, &key).await,
        }
    }
}

/// `Name <email>`, or just the email when the name is unknown.
#[must_use]
pub fn display_user(user: &User) -> String {
    if user.name.trim().is_empty() {
        user.email.clone()
    } else {
        format!("{} <{}>", user.name, user.email)
    }
}
