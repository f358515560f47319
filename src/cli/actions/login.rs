use crate::auth::{AuthFlow, AuthMode, Credentials};
use crate::cli::{actions::display_user, globals::GlobalArgs};
use anyhow::{anyhow, Result};
use tracing::warn;

/// Handle the login action
pub async fn handle(globals: &GlobalArgs, credentials: &Credentials) -> Result<()> {
    let mut client = globals.client()?;
    let mut flow = AuthFlow::new();
    flow.open(AuthMode::Login);

    if let Err(err) = flow.submit_login(&mut client, credentials).await {
        warn!("login failed: {err}");
        return Err(anyhow!(err.user_message()));
    }

    match client.session().user() {
        Some(user) => println!("Logged in as {}", display_user(user)),
        None => println!("Logged in"),
    }

    Ok(())
}
