//! Timeline - command-line client for Timeline Notebook
//!
//! Main entry point for the Timeline CLI.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use timeline_config::{ConfigOverrides, Environment, EnvironmentConfig};

mod commands;

use commands::{env, health, login, logout, navigate, register, routes, status};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Timeline - command-line client for Timeline Notebook
#[derive(Parser)]
#[command(name = "timeline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Target environment: development or production
    #[arg(long = "env", global = true, env = "TIMELINE_ENV")]
    pub environment: Option<String>,

    /// API base URL (overrides the environment default)
    #[arg(long, global = true, env = "TIMELINE_API_BASE_URL")]
    pub api_url: Option<String>,

    /// Media base URL (overrides the environment default)
    #[arg(long, global = true, env = "TIMELINE_MEDIA_BASE_URL")]
    pub media_url: Option<String>,

    /// WebSocket base URL (overrides the environment default)
    #[arg(long, global = true, env = "TIMELINE_WS_BASE_URL")]
    pub ws_url: Option<String>,

    /// Config file (default: timeline.toml in the user config dir)
    #[arg(long, global = true, env = "TIMELINE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show whether the current session is logged in
    Status(status::StatusArgs),

    /// Check which routes a session may enter
    Navigate(navigate::NavigateArgs),

    /// Log in and show the resulting status
    Login(login::LoginArgs),

    /// Log out of the current session
    Logout(logout::LogoutArgs),

    /// Create a new account
    Register(register::RegisterArgs),

    /// List application routes and their guards
    Routes(routes::RoutesArgs),

    /// Show the resolved environment configuration
    Env(env::EnvArgs),

    /// Check server health
    Health(health::HealthArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = resolve_config(&cli)?;
    init_tracing(cli.verbose, &config);

    tracing::debug!(
        environment = %config.environment,
        api_base_url = %config.api_base_url,
        "Configuration resolved"
    );

    let ctx = commands::Context {
        config,
        json_output: cli.json,
        verbose: cli.verbose,
    };

    // Dispatch to command handlers
    match cli.command {
        Commands::Status(args) => status::run(args, &ctx).await,
        Commands::Navigate(args) => navigate::run(args, &ctx).await,
        Commands::Login(args) => login::run(args, &ctx).await,
        Commands::Logout(args) => logout::run(args, &ctx).await,
        Commands::Register(args) => register::run(args, &ctx).await,
        Commands::Routes(args) => routes::run(args, &ctx).await,
        Commands::Env(args) => env::run(args, &ctx).await,
        Commands::Health(args) => health::run(args, &ctx).await,
    }
}

/// Resolve the environment once; everything downstream receives the result.
fn resolve_config(cli: &Cli) -> Result<EnvironmentConfig> {
    let environment = cli
        .environment
        .as_deref()
        .map(str::parse::<Environment>)
        .transpose()?;

    let overrides = ConfigOverrides {
        environment,
        api_base_url: cli.api_url.clone(),
        media_base_url: cli.media_url.clone(),
        ws_base_url: cli.ws_url.clone(),
    };

    let loaded = timeline_config::load_config(cli.config.as_deref(), &overrides)
        .context("Failed to load configuration")?;
    Ok(loaded.config)
}

/// Console logging to stderr; `RUST_LOG` wins over both `--verbose` and the
/// environment's log level.
fn init_tracing(verbose: bool, config: &EnvironmentConfig) {
    let level = if verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    let default_filter =
        format!("timeline={level},timeline_client={level},timeline_config={level},warn");

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
