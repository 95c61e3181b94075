//! Status command - shows whether the session is logged in.

use anyhow::Result;
use clap::Args;
use console::{Style, style};
use serde::Serialize;
use timeline_client::UserRef;

use super::{Context, describe_status};

/// Arguments for the status command.
#[derive(Args, Debug)]
pub struct StatusArgs {}

/// Status response for JSON output.
#[derive(Debug, Serialize)]
struct StatusOutput {
    reachable: bool,
    is_logged_in: bool,
    user: Option<UserRef>,
    api_base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Run the status command.
pub async fn run(_args: StatusArgs, ctx: &Context) -> Result<()> {
    let session = ctx.session()?;
    let result = session.check_auth_status().await;

    if ctx.json_output {
        let output = match &result {
            Ok(status) => StatusOutput {
                reachable: true,
                is_logged_in: status.is_logged_in,
                user: status.user.clone(),
                api_base_url: ctx.config.api_base_url.clone(),
                error: None,
            },
            Err(e) => StatusOutput {
                reachable: false,
                is_logged_in: false,
                user: None,
                api_base_url: ctx.config.api_base_url.clone(),
                error: Some(e.to_string()),
            },
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return result.map(|_| ()).map_err(Into::into);
    }

    let dim = Style::new().dim();

    println!();
    println!("{}", style("Timeline Session Status").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!();
    println!("  {} {}", dim.apply_to("Server:"), ctx.config.api_base_url);

    match result {
        Ok(status) => {
            let styled = if status.is_authenticated() {
                Style::new().green().apply_to(format!("● {}", describe_status(&status)))
            } else {
                Style::new().yellow().apply_to(format!("● {}", describe_status(&status)))
            };
            println!("  {} {}", dim.apply_to("Status:"), styled);
            println!();
            Ok(())
        }
        Err(e) => {
            println!(
                "  {} {}",
                dim.apply_to("Status:"),
                Style::new().red().apply_to("● check failed")
            );
            if ctx.verbose {
                println!("  {} {}", dim.apply_to("Error:"), e);
            }
            println!();
            Err(e.into())
        }
    }
}
