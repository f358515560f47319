//! In-memory session and its mirror in client storage under `auth_token` and
//! `user`. Only the token makes a session authenticated; the user record is
//! informational and may be missing or malformed.

use crate::auth::{errors::AuthError, storage::Storage};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::warn;

pub const AUTH_TOKEN_KEY: &str = "auth_token";
pub const USER_KEY: &str = "user";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
}

pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(value) => value,
        Id::Number(value) => value.to_string(),
    })
}

#[derive(Clone, Default)]
pub struct Session {
    user: Option<User>,
    token: Option<SecretString>,
}

impl Session {
    #[must_use]
    pub fn authenticated(token: SecretString, user: Option<User>) -> Self {
        Self {
            user,
            token: Some(token),
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub const fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("is_authenticated", &self.is_authenticated())
            .field("user", &self.user)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Reads and writes the session through a `Storage` backend.
#[derive(Debug)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: Storage> SessionStore<S> {
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Restores the persisted session. A malformed `user` entry still yields an
    /// authenticated session, with no user.
    ///
    /// # Errors
    /// Returns `AuthError::Storage` if the backend cannot be read.
    pub fn get(&self) -> Result<Session, AuthError> {
        let Some(token) = self.storage.get_item(AUTH_TOKEN_KEY)? else {
            return Ok(Session::default());
        };

        let user = match self.storage.get_item(USER_KEY)? {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(err) => {
                    warn!("ignoring malformed stored user: {err}");
                    None
                }
            },
            None => None,
        };

        Ok(Session::authenticated(SecretString::from(token), user))
    }

    /// Stores both entries together; on failure the previous session is kept.
    ///
    /// # Errors
    /// Returns `AuthError::Storage` if the entries cannot be written.
    pub fn set(&mut self, token: &SecretString, user: &User) -> Result<(), AuthError> {
        let user = serde_json::to_string(user)
            .map_err(|err| AuthError::Storage(format!("Failed to encode user: {err}")))?;

        self.storage
            .set_items(&[(USER_KEY, user.as_str()), (AUTH_TOKEN_KEY, token.expose_secret())])
    }

    /// # Errors
    /// Returns `AuthError::Storage` if the entries cannot be removed.
    pub fn clear(&mut self) -> Result<(), AuthError> {
        self.storage.remove_items(&[AUTH_TOKEN_KEY, USER_KEY])
    }
}
