//! Request and response types for the auth endpoints. Request types hold
//! passwords as secrets; the borrowed wire payloads that expose them are built
//! right before sending and must never be logged.

use crate::auth::{
    errors::AuthError,
    session::{string_or_number, User},
    validation,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: SecretString) -> Self {
        Self {
            email: email.into(),
            password,
        }
    }

    /// # Errors
    /// Returns `AuthError::Validation` for a malformed email or empty password.
    pub fn validate(&self) -> Result<(), AuthError> {
        validation::check_email(&self.email)?;
        validation::check_required("Password", self.password.expose_secret())
    }

    pub(crate) fn payload(&self) -> LoginPayload<'_> {
        LoginPayload {
            email: self.email.trim(),
            password: self.password.expose_secret(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Registration form. This is the only signup schema; the wire names are
/// fixed by `RegisterPayload`.
#[derive(Clone)]
pub struct SignupRequest {
    pub email: String,
    pub password: SecretString,
    pub password_confirm: SecretString,
    pub first_name: String,
    pub last_name: String,
}

impl SignupRequest {
    /// # Errors
    /// Returns `AuthError::Validation` for the first invalid field.
    pub fn validate(&self) -> Result<(), AuthError> {
        validation::check_required("First name", &self.first_name)?;
        validation::check_required("Last name", &self.last_name)?;
        validation::check_email(&self.email)?;
        validation::check_new_password(
            self.password.expose_secret(),
            self.password_confirm.expose_secret(),
        )
    }

    pub(crate) fn payload(&self) -> RegisterPayload<'_> {
        RegisterPayload {
            email: self.email.trim(),
            password1: self.password.expose_secret(),
            password2: self.password_confirm.expose_secret(),
            first_name: self.first_name.trim(),
            last_name: self.last_name.trim(),
        }
    }
}

impl std::fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .field("password_confirm", &"***")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

#[derive(Serialize)]
pub(crate) struct LoginPayload<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub(crate) struct RegisterPayload<'a> {
    pub email: &'a str,
    pub password1: &'a str,
    pub password2: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

#[derive(Serialize)]
pub(crate) struct ForgotPasswordPayload<'a> {
    pub email: &'a str,
}

#[derive(Serialize)]
pub(crate) struct ResetPasswordPayload<'a> {
    pub token: &'a str,
    pub new_password1: &'a str,
    pub new_password2: &'a str,
}

#[derive(Serialize)]
pub(crate) struct VerifyEmailPayload<'a> {
    pub key: &'a str,
}

/// User as returned by the API. Older backends send `first_name`/`last_name`
/// instead of `name`.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiUser {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
}

impl From<ApiUser> for User {
    fn from(user: ApiUser) -> Self {
        let name = user
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| {
                [user.first_name, user.last_name]
                    .into_iter()
                    .flatten()
                    .map(|part| part.trim().to_string())
                    .filter(|part| !part.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ")
            });

        Self {
            id: user.id,
            email: user.email,
            name,
        }
    }
}

#[derive(Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub user: ApiUser,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("access", &"***")
            .field("user", &self.user)
            .finish()
    }
}

/// Current user record; only `is_active` drives the verification check.
#[derive(Clone, Debug, Deserialize)]
pub struct CurrentUser {
    pub is_active: bool,
}
