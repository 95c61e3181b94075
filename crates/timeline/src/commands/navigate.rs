//! Navigate command - runs the route guard for one or more paths.
//!
//! All paths share one session, so the auth cache behaves as it would
//! across successive in-app navigations.

use anyhow::Result;
use clap::Args;
use console::Style;
use serde::Serialize;
use timeline_client::{Navigation, RouteGuard};

use super::Context;
use super::login::read_password;

/// Arguments for the navigate command.
#[derive(Args, Debug)]
pub struct NavigateArgs {
    /// Paths to navigate to, in order (e.g. /profile /admin-dashboard)
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Log in as this user before navigating
    #[arg(long)]
    pub login: Option<String>,

    /// Password for --login (prompted if omitted)
    #[arg(long, env = "TIMELINE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
struct NavigationOutput<'a> {
    path: &'a str,
    route: Option<&'static str>,
    guard: Option<RouteGuard>,
    #[serde(flatten)]
    navigation: Navigation,
}

/// Run the navigate command.
pub async fn run(args: NavigateArgs, ctx: &Context) -> Result<()> {
    let session = ctx.session()?;

    if let Some(username) = &args.login {
        let password = match args.password {
            Some(p) => p,
            None => read_password()?,
        };
        session.login(username, &password).await?;
    }

    let mut outputs = Vec::with_capacity(args.paths.len());
    for path in &args.paths {
        let navigation = session.navigate(path).await;
        let matched = session.guard().routes().resolve(path);
        outputs.push(NavigationOutput {
            path,
            route: matched.as_ref().map(|m| m.route.name),
            guard: matched.as_ref().map(|m| m.route.guard),
            navigation,
        });
    }

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&outputs)?);
        return Ok(());
    }

    let green = Style::new().green();
    let yellow = Style::new().yellow();
    let dim = Style::new().dim();

    for out in &outputs {
        let route = out.route.unwrap_or("<no route>");
        match &out.navigation {
            Navigation::Allow => {
                println!(
                    "{} {} {}",
                    green.apply_to("allow   "),
                    out.path,
                    dim.apply_to(route)
                );
            }
            Navigation::Redirect { to, reason } => {
                println!(
                    "{} {} -> {} {}",
                    yellow.apply_to("redirect"),
                    out.path,
                    to,
                    dim.apply_to(format!("{route}: {reason}"))
                );
            }
        }
    }

    Ok(())
}
