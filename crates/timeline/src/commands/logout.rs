//! Logout command.

use anyhow::Result;
use clap::Args;

use super::Context;

/// Arguments for the logout command.
#[derive(Args, Debug)]
pub struct LogoutArgs {}

/// Run the logout command.
pub async fn run(_args: LogoutArgs, ctx: &Context) -> Result<()> {
    let session = ctx.session()?;
    let response = session.logout().await?;

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else if response.message.is_empty() {
        println!("Logged out");
    } else {
        println!("{}", response.message);
    }

    Ok(())
}
