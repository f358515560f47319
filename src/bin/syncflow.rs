use anyhow::Result;
use syncflow::cli;

// Main function
#[tokio::main]
async fn main() -> Result<()> {
    // Parse arguments and set up logging
    let (globals, action) = cli::start()?;

    // Handle the action
    action.execute(&globals).await?;

    Ok(())
}
