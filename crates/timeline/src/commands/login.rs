//! Login command.
//!
//! The session cookie lives only as long as this process, so the command
//! reports the post-login status itself rather than leaving it for a later
//! `timeline status`.

use anyhow::{Result, bail};
use clap::Args;
use serde::Serialize;
use timeline_client::LoginStatus;

use super::{Context, describe_status};

/// Arguments for the login command.
#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Username
    #[arg(short, long)]
    pub username: String,

    /// Password (prompted if omitted)
    #[arg(short, long, env = "TIMELINE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoginOutput {
    message: Option<String>,
    status: LoginStatus,
}

/// Run the login command.
pub async fn run(args: LoginArgs, ctx: &Context) -> Result<()> {
    let password = match args.password {
        Some(p) => p,
        None => read_password()?,
    };

    let session = ctx.session()?;
    let response = session.login(&args.username, &password).await?;
    let status = session.check_auth_status().await?;

    if ctx.json_output {
        let output = LoginOutput {
            message: response.message,
            status,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        if let Some(message) = response.message {
            println!("{message}");
        }
        println!("{}", describe_status(&status));
    }

    Ok(())
}

/// Prompt for a password without echoing it.
pub(crate) fn read_password() -> Result<String> {
    let password = rpassword::prompt_password("Password: ")?;
    if password.is_empty() {
        bail!("No password provided");
    }
    Ok(password)
}
