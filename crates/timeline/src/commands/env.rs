//! Env command - shows the resolved environment configuration.

use anyhow::Result;
use clap::Args;
use console::{Style, style};

use super::Context;

/// Arguments for the env command.
#[derive(Args, Debug)]
pub struct EnvArgs {
    /// Also print the full URL for this media path
    #[arg(long)]
    pub media: Option<String>,
}

/// Run the env command.
pub async fn run(args: EnvArgs, ctx: &Context) -> Result<()> {
    let info = ctx.config.environment_info();

    if ctx.json_output {
        let mut value = serde_json::to_value(&info)?;
        if let Some(path) = &args.media {
            value["media_url"] = ctx.config.full_media_url(path).into();
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let dim = Style::new().dim();
    println!("{}", style("Timeline Environment").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!("  {} {}", dim.apply_to("Environment:"), info.environment);
    println!("  {} {}", dim.apply_to("API:"), info.api_base_url);
    println!("  {} {}", dim.apply_to("Media:"), info.media_base_url);
    println!("  {} {}", dim.apply_to("WebSocket:"), info.ws_base_url);
    println!("  {} {}ms", dim.apply_to("Timeout:"), info.timeout_ms);
    println!("  {} {}", dim.apply_to("Credentials:"), info.with_credentials);
    println!("  {} {}", dim.apply_to("Debug:"), info.debug);
    println!("  {} {}", dim.apply_to("Log level:"), info.log_level);
    if let Some(path) = &args.media {
        println!(
            "  {} {}",
            dim.apply_to("Media URL:"),
            ctx.config.full_media_url(path)
        );
    }

    Ok(())
}
