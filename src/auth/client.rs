//! Auth client for the SyncFlow REST API. It owns the in-memory session and
//! its persisted mirror; every mutation goes through `&mut self`, so a single
//! client never races with itself.

use crate::{
    auth::{
        api::{handle_empty_response, handle_json_response, send},
        config::{endpoints, ApiConfig},
        errors::AuthError,
        session::{Session, SessionStore, User},
        storage::Storage,
        types::{
            CurrentUser, Credentials, ForgotPasswordPayload, LoginResponse,
            ResetPasswordPayload, SignupRequest, VerifyEmailPayload,
        },
        validation,
    },
    APP_USER_AGENT,
};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, instrument, warn};

pub struct AuthClient<S> {
    http: Client,
    config: ApiConfig,
    store: SessionStore<S>,
    session: Session,
}

impl<S: Storage> AuthClient<S> {
    /// Builds a client and restores any session already in `storage`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built or storage cannot
    /// be read.
    pub fn new(config: ApiConfig, storage: S) -> Result<Self, AuthError> {
        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(|err| AuthError::Config(format!("Failed to build HTTP client: {err}")))?;

        let store = SessionStore::new(storage);
        let session = store.get()?;

        debug!(
            authenticated = session.is_authenticated(),
            "session restored"
        );

        Ok(Self {
            http,
            config,
            store,
            session,
        })
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    #[must_use]
    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    /// Logs in and persists `{access, user}`. On any failure the previous
    /// session, in memory and in storage, is left as it was.
    ///
    /// # Errors
    /// Returns `AuthError::Validation` before sending, `AuthError::Http` with
    /// the server message (or "Login failed"), or a transport/parse error.
    #[instrument(skip_all)]
    pub async fn login(&mut self, credentials: &Credentials) -> Result<(), AuthError> {
        credentials.validate()?;

        let url = self.config.endpoint(endpoints::LOGIN)?;
        let response = send(self.http.post(url).json(&credentials.payload())).await?;
        let body: LoginResponse = handle_json_response(response, "Login failed").await?;

        if body.access.trim().is_empty() {
            return Err(AuthError::Parse(
                "Login response did not include an access token".to_string(),
            ));
        }

        let token = SecretString::from(body.access);
        let user = User::from(body.user);

        self.store.set(&token, &user)?;
        self.session = Session::authenticated(token, Some(user));

        info!("login succeeded");

        Ok(())
    }

    /// Registers an account. Does not log in; the caller moves on to email
    /// verification.
    ///
    /// # Errors
    /// Returns `AuthError::Validation` before sending, `AuthError::Http` with
    /// the server message (or "Signup failed"), or a transport error.
    #[instrument(skip_all)]
    pub async fn signup(&mut self, request: &SignupRequest) -> Result<(), AuthError> {
        request.validate()?;

        let url = self.config.endpoint(endpoints::SIGNUP)?;
        let response = send(self.http.post(url).json(&request.payload())).await?;
        handle_empty_response(response, "Signup failed").await?;

        info!("signup accepted, email verification pending");

        Ok(())
    }

    /// Fetches the current user and reports `is_active`. The session token is
    /// sent as a bearer token when there is one.
    ///
    /// # Errors
    /// Returns `AuthError::Http` (fallback "Verification check failed") or a
    /// transport/parse error.
    #[instrument(skip_all)]
    pub async fn check_verified(&self) -> Result<bool, AuthError> {
        let url = self.config.endpoint(endpoints::USER)?;
        let mut request = self.http.get(url);
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = send(request).await?;
        let user: CurrentUser =
            handle_json_response(response, "Verification check failed").await?;

        debug!(is_active = user.is_active, "verification status");

        Ok(user.is_active)
    }

    /// Clears the session locally. There is no server-side revocation.
    ///
    /// The in-memory session is cleared first, so the client is logged out
    /// even when storage fails.
    ///
    /// # Errors
    /// Returns `AuthError::Storage` if the persisted entries cannot be removed.
    #[instrument(skip_all)]
    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.session = Session::default();

        if let Err(err) = self.store.clear() {
            warn!("failed to clear stored session: {err}");
            return Err(err);
        }

        info!("logged out");

        Ok(())
    }

    /// Requests a password reset email.
    ///
    /// # Errors
    /// Returns `AuthError::Validation`, `AuthError::Http` (fallback "Password
    /// reset request failed"), or a transport error.
    #[instrument(skip_all)]
    pub async fn forgot_password(&self, email: &str) -> Result<(), AuthError> {
        validation::check_email(email)?;

        let url = self.config.endpoint(endpoints::FORGOT_PASSWORD)?;
        let payload = ForgotPasswordPayload {
            email: email.trim(),
        };
        let response = send(self.http.post(url).json(&payload)).await?;

        handle_empty_response(response, "Password reset request failed").await
    }

    /// Sets a new password using the token from the reset email.
    ///
    /// # Errors
    /// Returns `AuthError::Validation`, `AuthError::Http` (fallback "Password
    /// reset failed"), or a transport error.
    #[instrument(skip_all)]
    pub async fn reset_password(
        &self,
        token: &SecretString,
        password: &SecretString,
        confirmation: &SecretString,
    ) -> Result<(), AuthError> {
        validation::check_required("Reset token", token.expose_secret())?;
        validation::check_new_password(password.expose_secret(), confirmation.expose_secret())?;

        let url = self.config.endpoint(endpoints::RESET_PASSWORD)?;
        let payload = ResetPasswordPayload {
            token: token.expose_secret().trim(),
            new_password1: password.expose_secret(),
            new_password2: confirmation.expose_secret(),
        };
        let response = send(self.http.post(url).json(&payload)).await?;

        handle_empty_response(response, "Password reset failed").await
    }

    /// Confirms an email address with the key from the verification link.
    ///
    /// # Errors
    /// Returns `AuthError::Validation`, `AuthError::Http` (fallback "Email
    /// verification failed"), or a transport error.
    #[instrument(skip_all)]
    pub async fn verify_email(&self, key: &SecretString) -> Result<(), AuthError> {
        validation::check_required("Verification key", key.expose_secret())?;

        let url = self.config.endpoint(endpoints::VERIFY_EMAIL)?;
        let payload = VerifyEmailPayload {
            key: key.expose_secret().trim(),
        };
        let response = send(self.http.post(url).json(&payload)).await?;

        handle_empty_response(response, "Email verification failed").await
    }
}

impl<S> std::fmt::Debug for AuthClient<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
