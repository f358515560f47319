pub mod api;
pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_PASSWORD_CONFIRM: &str = "password-confirm";
pub const ARG_FIRST_NAME: &str = "first-name";
pub const ARG_LAST_NAME: &str = "last-name";
pub const ARG_TOKEN: &str = "token";
pub const ARG_KEY: &str = "key";

fn email_arg() -> Arg {
    Arg::new(ARG_EMAIL)
        .short('e')
        .long(ARG_EMAIL)
        .help("Account email address")
        .env("SYNCFLOW_EMAIL")
        .required(true)
}

fn password_arg() -> Arg {
    Arg::new(ARG_PASSWORD)
        .short('p')
        .long(ARG_PASSWORD)
        .help("Account password")
        .env("SYNCFLOW_PASSWORD")
        .hide_env_values(true)
        .required(true)
}

fn password_confirm_arg() -> Arg {
    Arg::new(ARG_PASSWORD_CONFIRM)
        .long(ARG_PASSWORD_CONFIRM)
        .help("Password confirmation (defaults to --password)")
        .env("SYNCFLOW_PASSWORD_CONFIRM")
        .hide_env_values(true)
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("syncflow")
        .about("SyncFlow authentication client")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("login")
                .about("Log in and store the session")
                .arg(email_arg())
                .arg(password_arg()),
        )
        .subcommand(
            Command::new("signup")
                .about("Create an account; a verification email is sent")
                .arg(
                    Arg::new(ARG_FIRST_NAME)
                        .long(ARG_FIRST_NAME)
                        .help("First name")
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_LAST_NAME)
                        .long(ARG_LAST_NAME)
                        .help("Last name")
                        .required(true),
                )
                .arg(email_arg())
                .arg(password_arg())
                .arg(password_confirm_arg()),
        )
        .subcommand(Command::new("verify").about("Check whether the email address has been verified"))
        .subcommand(Command::new("logout").about("Remove the stored session"))
        .subcommand(Command::new("status").about("Show the stored session"))
        .subcommand(
            Command::new("forgot-password")
                .about("Request a password reset email")
                .arg(email_arg()),
        )
        .subcommand(
            Command::new("reset-password")
                .about("Set a new password with the token from the reset email")
                .arg(
                    Arg::new(ARG_TOKEN)
                        .long(ARG_TOKEN)
                        .help("Reset token from the email")
                        .env("SYNCFLOW_RESET_TOKEN")
                        .hide_env_values(true)
                        .required(true),
                )
                .arg(password_arg().help("New password"))
                .arg(password_confirm_arg()),
        )
        .subcommand(
            Command::new("verify-email")
                .about("Confirm an email address with the key from the verification link")
                .arg(
                    Arg::new(ARG_KEY)
                        .long(ARG_KEY)
                        .help("Verification key from the link")
                        .required(true),
                ),
        );

    let command = api::with_args(command);
    logging::with_args(command)
}
