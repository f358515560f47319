use crate::auth::{AuthFlow, AuthMode};
use crate::cli::globals::GlobalArgs;
use anyhow::{anyhow, Result};
use secrecy::SecretString;
use tracing::warn;

/// Handle the verify action: the "Done" step after signup
pub async fn handle(globals: &GlobalArgs) -> Result<()> {
    let client = globals.client()?;
    let mut flow = AuthFlow::new();
    flow.open(AuthMode::Verify);

    match flow.confirm_verified(&client).await {
        Ok(true) => println!("E-mail address verified"),
        Ok(false) => {
            println!("E-mail address not verified yet.");
            println!("Click the link in the verification email, then run `syncflow verify` again.");
        }
        Err(err) => {
            warn!("verification check failed: {err}");
            return Err(anyhow!(err.user_message()));
        }
    }

    Ok(())
}

/// Handle the verify-email action
pub async fn verify_email(globals: &GlobalArgs, key: &SecretString) -> Result<()> {
    let client = globals.client()?;

    client.verify_email(key).await.map_err(|err| {
        warn!("email verification failed: {err}");
        anyhow!(err.user_message())
    })?;

    println!("E-mail address confirmed");

    Ok(())
}
