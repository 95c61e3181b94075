//! Configuration for the Timeline Notebook client.
//!
//! The deployment [`Environment`] is chosen explicitly, once, at startup
//! (CLI flag, env var or config file) and resolved into an
//! [`EnvironmentConfig`] that is passed down to everything else. Nothing
//! downstream inspects the process environment on its own.
//!
//! Resolution layers defaults, an optional `timeline.toml`, and explicit
//! overrides; see [`discovery`].

pub mod discovery;
pub mod error;
pub mod types;
pub mod urls;

pub use discovery::{
    load_config, load_config_file, resolve, xdg_config_dir, xdg_config_path, ConfigOverrides,
    LoadedConfig,
};
pub use error::{ConfigError, Result};
pub use types::*;
pub use urls::{build_query_string, normalize_path};
