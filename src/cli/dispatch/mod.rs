//! Maps validated CLI matches to the global options and the action to run.

use crate::auth::SignupRequest;
use crate::cli::actions::Action;
use crate::cli::commands::{
    api, ARG_EMAIL, ARG_FIRST_NAME, ARG_KEY, ARG_LAST_NAME, ARG_PASSWORD, ARG_PASSWORD_CONFIRM,
    ARG_TOKEN,
};
use crate::cli::globals::GlobalArgs;
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use std::time::Duration;

/// Builds the global options shared by every action.
///
/// # Errors
/// Returns an error if the session file location cannot be determined.
pub fn globals(matches: &clap::ArgMatches) -> Result<GlobalArgs> {
    let options = api::Options::parse(matches)?;

    let mut globals = GlobalArgs::new(options.api_base_url, options.session_file);
    globals.set_timeout(Duration::from_secs(options.timeout_seconds));

    Ok(globals)
}

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if the subcommand is missing or a required argument is absent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let (name, sub) = matches.subcommand().context("missing command")?;

    let action = match name {
        "login" => Action::Login {
            email: string(sub, ARG_EMAIL)?,
            password: secret(sub, ARG_PASSWORD)?,
        },
        "signup" => Action::Signup(SignupRequest {
            email: string(sub, ARG_EMAIL)?,
            password: secret(sub, ARG_PASSWORD)?,
            password_confirm: confirmation(sub)?,
            first_name: string(sub, ARG_FIRST_NAME)?,
            last_name: string(sub, ARG_LAST_NAME)?,
        }),
        "verify" => Action::Verify,
        "logout" => Action::Logout,
        "status" => Action::Status,
        "forgot-password" => Action::ForgotPassword {
            email: string(sub, ARG_EMAIL)?,
        },
        "reset-password" => Action::ResetPassword {
            token: secret(sub, ARG_TOKEN)?,
            password: secret(sub, ARG_PASSWORD)?,
            password_confirm: confirmation(sub)?,
        },
        "verify-email" => Action::VerifyEmail {
            key: secret(sub, ARG_KEY)?,
        },
        other => return Err(anyhow!("unknown command: {other}")),
    };

    Ok(action)
}

fn string(matches: &clap::ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}

fn secret(matches: &clap::ArgMatches, id: &str) -> Result<SecretString> {
    string(matches, id).map(SecretString::from)
}

// confirmation falls back to the password itself when not given
fn confirmation(matches: &clap::ArgMatches) -> Result<SecretString> {
    match matches.get_one::<String>(ARG_PASSWORD_CONFIRM) {
        Some(value) => Ok(SecretString::from(value.clone())),
        None => secret(matches, ARG_PASSWORD),
    }
}
