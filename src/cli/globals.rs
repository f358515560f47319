use crate::auth::{AuthClient, AuthError, ApiConfig, FileStorage};
use std::{path::PathBuf, time::Duration};

#[derive(Clone, Debug)]
pub struct GlobalArgs {
    pub api_base_url: String,
    pub session_file: PathBuf,
    pub timeout: Duration,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_base_url: String, session_file: PathBuf) -> Self {
        Self {
            api_base_url,
            session_file,
            timeout: Duration::from_secs(crate::auth::config::DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// # Errors
    /// Returns `AuthError::Config` if the base URL is invalid.
    pub fn api_config(&self) -> Result<ApiConfig, AuthError> {
        ApiConfig::new(&self.api_base_url, self.timeout)
    }

    /// Client backed by the session file, with any stored session restored.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the session file
    /// cannot be read.
    pub fn client(&self) -> Result<AuthClient<FileStorage>, AuthError> {
        AuthClient::new(self.api_config()?, FileStorage::new(&self.session_file))
    }
}
