//! Health command - checks that the API server is up.

use anyhow::Result;
use clap::Args;
use console::Style;
use serde::Serialize;

use super::Context;

/// Arguments for the health command.
#[derive(Args, Debug)]
pub struct HealthArgs {}

#[derive(Debug, Serialize)]
struct HealthOutput {
    healthy: bool,
    version: Option<String>,
    message: Option<String>,
}

/// Run the health command.
pub async fn run(_args: HealthArgs, ctx: &Context) -> Result<()> {
    let client = ctx.session()?.client().clone();
    let result = client.health().check().await;

    let output = match &result {
        Ok(h) => HealthOutput {
            healthy: h.is_healthy(),
            version: h.version.clone(),
            message: h.message.clone(),
        },
        Err(e) => HealthOutput {
            healthy: false,
            version: None,
            message: Some(e.to_string()),
        },
    };

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if output.healthy {
        println!(
            "{} {}",
            Style::new().green().apply_to("● healthy"),
            output.version.as_deref().unwrap_or("")
        );
    } else {
        println!(
            "{} {}",
            Style::new().red().apply_to("● unhealthy"),
            output.message.as_deref().unwrap_or("")
        );
    }

    result.map(|_| ()).map_err(Into::into)
}
