//! HTTP helpers shared by the auth client: send, decode, and turn non-2xx
//! responses into `AuthError::Http` with a readable message. Nothing here
//! retries; the client timeout is the only request policy.

use crate::auth::errors::AuthError;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// Maximum number of error body characters surfaced to the user.
const MAX_ERROR_CHARS: usize = 200;

/// Sends a request, mapping transport failures and timeouts.
pub(crate) async fn send(request: RequestBuilder) -> Result<Response, AuthError> {
    let response = request.send().await.map_err(|err| {
        warn!("auth request failed: {err}");
        AuthError::from(err)
    })?;

    debug!(status = %response.status(), url = %response.url(), "auth response");

    Ok(response)
}

/// Parses JSON responses and surfaces HTTP errors with `fallback` when the
/// server gave no usable message.
pub(crate) async fn handle_json_response<T: DeserializeOwned>(
    response: Response,
    fallback: &str,
) -> Result<T, AuthError> {
    if response.status().is_success() {
        response
            .json::<T>()
            .await
            .map_err(AuthError::from)
    } else {
        Err(error_from_response(response, fallback).await)
    }
}

/// Accepts any 2xx regardless of body.
pub(crate) async fn handle_empty_response(
    response: Response,
    fallback: &str,
) -> Result<(), AuthError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(error_from_response(response, fallback).await)
    }
}

async fn error_from_response(response: Response, fallback: &str) -> AuthError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = server_message(&body).unwrap_or_else(|| fallback.to_string());

    AuthError::Http {
        status,
        message: sanitize(&message, fallback),
    }
}

/// Extracts the human-readable message from an error body.
///
/// Order: `detail`, `non_field_errors`, `message`/`error`, then the first
/// field error. Non-JSON bodies yield `None`.
#[must_use]
pub fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body.trim()).ok()?;

    match &value {
        Value::Object(map) => ["detail", "non_field_errors", "message", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(first_string))
            .or_else(|| map.values().find_map(first_string)),
        other => first_string(other),
    }
}

fn first_string(value: &Value) -> Option<String> {
    match value {
        Value::String(message) if !message.trim().is_empty() => Some(message.clone()),
        Value::Array(items) => items.iter().find_map(first_string),
        _ => None,
    }
}

fn sanitize(message: &str, fallback: &str) -> String {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
