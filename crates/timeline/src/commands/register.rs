//! Register command.

use anyhow::Result;
use clap::Args;
use timeline_client::RegisterRequest;

use super::Context;
use super::login::read_password;

/// Arguments for the register command.
#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Username
    #[arg(short, long)]
    pub username: String,

    /// Email address
    #[arg(short, long)]
    pub email: String,

    /// Password (prompted if omitted)
    #[arg(short, long, env = "TIMELINE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Run the register command.
pub async fn run(args: RegisterArgs, ctx: &Context) -> Result<()> {
    let password = match args.password {
        Some(p) => p,
        None => read_password()?,
    };

    let session = ctx.session()?;
    let response = session
        .register(RegisterRequest {
            username: args.username,
            email: args.email,
            password,
        })
        .await?;

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("{}", response.message);
    }

    Ok(())
}
