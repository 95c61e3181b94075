//! CLI command handlers.

pub mod env;
pub mod health;
pub mod login;
pub mod logout;
pub mod navigate;
pub mod register;
pub mod routes;
pub mod status;

use anyhow::Result;
use timeline_client::{LoginStatus, Session, TimelineClient};
use timeline_config::EnvironmentConfig;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Resolved environment configuration.
    pub config: EnvironmentConfig,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// Build a fresh session (client + auth cache) from the config.
    pub fn session(&self) -> Result<Session> {
        let client = TimelineClient::from_config(&self.config)?;
        Ok(Session::new(client))
    }
}

/// One-line description of a login status.
pub(crate) fn describe_status(status: &LoginStatus) -> String {
    match (&status.user, status.is_logged_in) {
        (Some(user), true) => format!(
            "logged in as {} ({})",
            user.username.as_deref().unwrap_or("<unknown>"),
            user.role.as_deref().unwrap_or("no role")
        ),
        _ => "not logged in".to_string(),
    }
}
