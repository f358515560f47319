//! Authentication core: session persistence, the REST client for the auth
//! endpoints, and the auth-mode flow that hosts render from.
//!
//! Flow Overview: Login posts credentials and persists `{access, user}` to the
//! session store. Signup posts the registration payload and moves the flow to
//! `verify` without logging in. The verify step polls the current user record
//! and closes once `is_active` is true. Logout only clears local state; there
//! is no server-side revocation.
//!
//! Tokens and passwords are held as `SecretString` and must never be logged.

pub mod api;
pub mod client;
pub mod config;
pub mod errors;
pub mod flow;
pub mod session;
pub mod storage;
pub mod types;
pub mod validation;

pub use client::AuthClient;
pub use config::ApiConfig;
pub use errors::AuthError;
pub use flow::{AuthFlow, AuthMode};
pub use session::{Session, SessionStore, User};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use types::{Credentials, SignupRequest};
