//! API location and request policy. The base URL is public configuration;
//! never put credentials in it.

use crate::auth::errors::AuthError;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://syncfloww.onrender.com/api/";

/// Default request timeout (seconds) applied to every auth call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Endpoint paths relative to the API base URL.
pub mod endpoints {
    pub const LOGIN: &str = "auth/login/";
    pub const SIGNUP: &str = "auth/register/";
    pub const USER: &str = "auth/user/";
    pub const FORGOT_PASSWORD: &str = "auth/forgot-password/";
    pub const RESET_PASSWORD: &str = "auth/reset-password/";
    pub const VERIFY_EMAIL: &str = "auth/verify-email/";
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    base_url: Url,
    timeout: Duration,
}

impl ApiConfig {
    /// # Errors
    /// Returns `AuthError::Config` if the base URL is empty, cannot be parsed,
    /// or does not use http(s).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AuthError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            timeout,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolves an endpoint path against the base URL, keeping any base path
    /// such as `/api/`.
    ///
    /// # Errors
    /// Returns `AuthError::Config` if the joined URL is invalid.
    pub fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        self.base_url
            .join(path.trim().trim_start_matches('/'))
            .map_err(|err| AuthError::Config(format!("Invalid endpoint {path}: {err}")))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_BASE_URL)
                .unwrap_or_else(|_| unreachable!("default base URL is valid")),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

fn normalize_base_url(base_url: &str) -> Result<Url, AuthError> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return Err(AuthError::Config("API base URL is not configured.".to_string()));
    }

    // Url::join replaces the last path segment unless the base ends with '/'
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };

    let url = Url::parse(&with_slash)
        .map_err(|err| AuthError::Config(format!("Invalid API base URL {trimmed}: {err}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(AuthError::Config(format!(
            "Invalid API base URL {trimmed}: unsupported scheme {scheme}"
        ))),
    }
}
