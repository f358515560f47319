use crate::cli::globals::GlobalArgs;
use anyhow::{anyhow, Result};
use secrecy::SecretString;
use tracing::warn;

/// Handle the forgot-password action
pub async fn forgot(globals: &GlobalArgs, email: &str) -> Result<()> {
    let client = globals.client()?;

    client.forgot_password(email).await.map_err(|err| {
        warn!("password reset request failed: {err}");
        anyhow!(err.user_message())
    })?;

    println!(
        "If an account exists for {}, a password reset link has been sent.",
        email.trim()
    );

    Ok(())
}

/// Handle the reset-password action
pub async fn reset(
    globals: &GlobalArgs,
    token: &SecretString,
    password: &SecretString,
    confirmation: &SecretString,
) -> Result<()> {
    let client = globals.client()?;

    client
        .reset_password(token, password, confirmation)
        .await
        .map_err(|err| {
            warn!("password reset failed: {err}");
            anyhow!(err.user_message())
        })?;

    println!("Password updated. You can now log in.");

    Ok(())
}
