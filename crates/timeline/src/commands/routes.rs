//! Routes command - prints the route table.

use anyhow::Result;
use clap::Args;
use console::{Style, style};
use timeline_client::{RouteGuard, RouteTable};

use super::Context;

/// Arguments for the routes command.
#[derive(Args, Debug)]
pub struct RoutesArgs {
    /// Only show routes that need a login
    #[arg(long)]
    pub protected: bool,
}

/// Run the routes command.
pub async fn run(args: RoutesArgs, ctx: &Context) -> Result<()> {
    let table = RouteTable::timeline();
    let routes: Vec<_> = table
        .routes()
        .iter()
        .filter(|r| !args.protected || r.guard != RouteGuard::Public)
        .collect();

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&routes)?);
        return Ok(());
    }

    let dim = Style::new().dim();
    println!("{}", style("Routes").bold());
    println!("{}", dim.apply_to("─".repeat(50)));
    for route in routes {
        let guard = match route.guard {
            RouteGuard::Public => dim.apply_to(route.guard.to_string()),
            RouteGuard::RequiresAuth => Style::new().yellow().apply_to(route.guard.to_string()),
            RouteGuard::AdminOnly => Style::new().red().apply_to(route.guard.to_string()),
        };
        println!("  {:<20} {:<16} {}", route.path, route.name, guard);
    }

    Ok(())
}
