use crate::auth::{AuthFlow, AuthMode, SignupRequest};
use crate::cli::globals::GlobalArgs;
use anyhow::{anyhow, Result};
use tracing::{debug, warn};

/// Handle the signup action
pub async fn handle(globals: &GlobalArgs, request: &SignupRequest) -> Result<()> {
    let mut client = globals.client()?;
    let mut flow = AuthFlow::new();
    flow.open(AuthMode::Signup);

    if let Err(err) = flow.submit_signup(&mut client, request).await {
        warn!("signup failed: {err}");
        return Err(anyhow!(err.user_message()));
    }

    debug!(mode = %flow.mode(), "signup submitted");

    println!("Verify your e-mail address");
    println!("A link to verify your e-mail address has been sent to {}.", request.email.trim());
    println!("Click on it, then run `syncflow verify`.");

    Ok(())
}
