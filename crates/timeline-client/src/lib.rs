//! HTTP client SDK for the Timeline Notebook API.
//!
//! Besides typed access to the auth and health endpoints, this crate holds
//! the client-side navigation logic: a short-lived [`AuthCache`] of the
//! server's login status and a [`NavigationGuard`] that turns that status
//! into allow/redirect decisions per route.
//!
//! # Example
//!
//! ```no_run
//! use timeline_client::{Navigation, Session, TimelineClient};
//!
//! # async fn example() -> timeline_client::Result<()> {
//! let client = TimelineClient::builder()
//!     .base_url("http://localhost:5000/api")
//!     .build()?;
//! let session = Session::new(client);
//!
//! session.login("alice", "secret").await?;
//!
//! match session.navigate("/profile").await {
//!     Navigation::Allow => println!("welcome"),
//!     Navigation::Redirect { to, reason } => println!("-> {to} ({reason})"),
//! }
//!
//! session.logout().await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod clock;
pub mod endpoints;
pub mod error;
pub mod router;
pub mod session;
pub mod types;

pub use auth::{AuthCache, AuthCacheEntry, DEFAULT_AUTH_TTL, StatusSource};
pub use client::{ClientBuilder, TimelineClient};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use router::{
    ADMIN_LOGIN_PATH, LOGIN_PATH, Navigation, NavigationGuard, RedirectReason, Route, RouteGuard,
    RouteMatch, RouteTable,
};
pub use session::Session;
pub use types::*;
