//! Form checks run before any request is sent.

use crate::auth::errors::AuthError;
use regex::Regex;

pub const MIN_PASSWORD_LEN: usize = 8;

#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_or(false, |re| re.is_match(email))
}

/// # Errors
/// Returns `AuthError::Validation` if the address is empty or malformed.
pub fn check_email(email: &str) -> Result<(), AuthError> {
    if email.trim().is_empty() {
        return Err(AuthError::Validation("Email is required".to_string()));
    }
    if !valid_email(email.trim()) {
        return Err(AuthError::Validation(
            "Please enter a valid email address".to_string(),
        ));
    }
    Ok(())
}

/// # Errors
/// Returns `AuthError::Validation` if `value` is blank.
pub fn check_required(field: &str, value: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// New passwords only; login accepts whatever the account already has.
///
/// # Errors
/// Returns `AuthError::Validation` if the password is too short or the
/// confirmation differs.
pub fn check_new_password(password: &str, confirmation: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if password != confirmation {
        return Err(AuthError::Validation("Passwords don't match".to_string()));
    }
    Ok(())
}
