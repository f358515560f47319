use crate::cli::{actions::display_user, globals::GlobalArgs};
use anyhow::Result;

/// Handle the logout action
pub fn logout(globals: &GlobalArgs) -> Result<()> {
    let mut client = globals.client()?;
    let was_authenticated = client.is_authenticated();

    client.logout()?;

    if was_authenticated {
        println!("Logged out");
    } else {
        println!("Not logged in");
    }

    Ok(())
}

/// Handle the status action
pub fn status(globals: &GlobalArgs) -> Result<()> {
    let client = globals.client()?;
    let session = client.session();

    if session.is_authenticated() {
        match session.user() {
            Some(user) => println!("Logged in as {}", display_user(user)),
            None => println!("Logged in"),
        }
    } else {
        println!("Not logged in");
    }
    println!("Session file: {}", globals.session_file.display());

    Ok(())
}
