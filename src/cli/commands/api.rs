use crate::auth::{config::DEFAULT_API_BASE_URL, config::DEFAULT_TIMEOUT_SECS, storage};
use anyhow::{anyhow, Result};
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

pub const ARG_API_BASE_URL: &str = "api-base-url";
pub const ARG_SESSION_FILE: &str = "session-file";
pub const ARG_TIMEOUT: &str = "timeout";

#[derive(Clone, Debug)]
pub struct Options {
    pub api_base_url: String,
    pub session_file: PathBuf,
    pub timeout_seconds: u64,
}

impl Options {
    /// # Errors
    /// Returns an error if no session file was given and the platform config
    /// directory cannot be determined.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let api_base_url = matches
            .get_one::<String>(ARG_API_BASE_URL)
            .cloned()
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let session_file = match matches.get_one::<PathBuf>(ARG_SESSION_FILE) {
            Some(path) => path.clone(),
            None => storage::default_session_path().ok_or_else(|| {
                anyhow!("cannot determine the session file location, pass --{ARG_SESSION_FILE}")
            })?,
        };

        let timeout_seconds = matches
            .get_one::<u64>(ARG_TIMEOUT)
            .copied()
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            api_base_url,
            session_file,
            timeout_seconds,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_BASE_URL)
                .long(ARG_API_BASE_URL)
                .help("Base URL of the SyncFlow API")
                .env("SYNCFLOW_API_BASE_URL")
                .global(true)
                .default_value(DEFAULT_API_BASE_URL),
        )
        .arg(
            Arg::new(ARG_SESSION_FILE)
                .long(ARG_SESSION_FILE)
                .help("Where the session (token and user) is stored")
                .long_help(
                    "Where the session (token and user) is stored. Defaults to session.json in the platform config directory.",
                )
                .env("SYNCFLOW_SESSION_FILE")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long(ARG_TIMEOUT)
                .help("Request timeout in seconds")
                .env("SYNCFLOW_TIMEOUT")
                .global(true)
                .default_value("10")
                .value_parser(clap::value_parser!(u64).range(1..=300)),
        )
}
