//! Route table and per-navigation guard.
//!
//! Routes carry a [`RouteGuard`] kind. The [`NavigationGuard`] resolves a
//! path against the table and turns the login status into a
//! [`Navigation`] decision. Status-check failures never escape: they become
//! redirects.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::auth::AuthCache;

/// Where unauthenticated users are sent.
pub const LOGIN_PATH: &str = "/login";

/// Where non-admins are sent when they try the admin dashboard.
pub const ADMIN_LOGIN_PATH: &str = "/admin-login";

// ─────────────────────────────────────────────────────────────────────────────
// Routes
// ─────────────────────────────────────────────────────────────────────────────

/// Access requirement attached to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteGuard {
    /// Anyone may enter.
    Public,
    /// A logged-in user is required (checked through the cache).
    RequiresAuth,
    /// A logged-in admin is required (always checked fresh).
    AdminOnly,
}

impl fmt::Display for RouteGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Public => "public",
            Self::RequiresAuth => "requires-auth",
            Self::AdminOnly => "admin-only",
        })
    }
}

/// A named path pattern. Segments starting with `:` capture a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub name: &'static str,
    pub path: &'static str,
    pub guard: RouteGuard,
}

impl Route {
    pub const fn new(name: &'static str, path: &'static str, guard: RouteGuard) -> Self {
        Self { name, path, guard }
    }

    /// Match a request path, returning captured params on success.
    ///
    /// Static segments compare case-insensitively; empty segments (doubled
    /// or trailing slashes) are ignored.
    fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let pattern: Vec<&str> = segments(self.path).collect();
        let actual: Vec<&str> = segments(path).collect();
        if pattern.len() != actual.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (want, got) in pattern.iter().zip(&actual) {
            if let Some(name) = want.strip_prefix(':') {
                params.insert(name.to_string(), (*got).to_string());
            } else if !want.eq_ignore_ascii_case(got) {
                return None;
            }
        }
        Some(params)
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// A resolved route plus captured parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: HashMap<String, String>,
}

/// Ordered route table; the first matching route wins.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The Timeline Notebook application routes.
    pub fn timeline() -> Self {
        use RouteGuard::*;
        Self::new(vec![
            Route::new("Home", "/", Public),
            Route::new("AdminLogin", ADMIN_LOGIN_PATH, Public),
            Route::new("AdminDashboard", "/admin-dashboard", AdminOnly),
            Route::new("TimeCapsules", "/time-capsules", Public),
            Route::new("MessageWall", "/messages", Public),
            Route::new("MessagePublish", "/messages/publish", RequiresAuth),
            Route::new("MessageDetail", "/messages/:id", Public),
            Route::new("UserRegister", "/register", Public),
            Route::new("UserLogin", LOGIN_PATH, Public),
            Route::new("UserProfile", "/profile", RequiresAuth),
        ])
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Resolve a path (query string and fragment are ignored).
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_>> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        self.routes.iter().find_map(|route| {
            route
                .matches(path)
                .map(|params| RouteMatch { route, params })
        })
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::timeline()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decisions
// ─────────────────────────────────────────────────────────────────────────────

/// Why a navigation was redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectReason {
    /// The server says nobody is logged in.
    NotLoggedIn,
    /// Logged in, but without the role the route needs.
    Forbidden,
    /// The status check itself failed.
    CheckFailed,
}

impl fmt::Display for RedirectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotLoggedIn => "not logged in",
            Self::Forbidden => "insufficient role",
            Self::CheckFailed => "login status check failed",
        })
    }
}

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Navigation {
    Allow,
    Redirect { to: String, reason: RedirectReason },
}

impl Navigation {
    fn redirect(to: &str, reason: RedirectReason) -> Self {
        Self::Redirect {
            to: to.to_string(),
            reason,
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Redirect target, if any.
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::Allow => None,
            Self::Redirect { to, .. } => Some(to),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Guard
// ─────────────────────────────────────────────────────────────────────────────

/// Decides whether each navigation may proceed.
///
/// Owns the route table and shares the [`AuthCache`]; the cache's status
/// source also serves the uncached admin check.
#[derive(Debug, Clone)]
pub struct NavigationGuard {
    routes: Arc<RouteTable>,
    cache: Arc<AuthCache>,
}

impl NavigationGuard {
    pub fn new(routes: RouteTable, cache: Arc<AuthCache>) -> Self {
        Self {
            routes: Arc::new(routes),
            cache,
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn cache(&self) -> &Arc<AuthCache> {
        &self.cache
    }

    /// Decide a navigation to `path`.
    ///
    /// Unknown paths and public routes are allowed without a status check.
    pub async fn navigate(&self, path: &str) -> Navigation {
        let guard = match self.routes.resolve(path) {
            Some(m) => m.route.guard,
            None => {
                debug!(path, "No route matched, allowing");
                return Navigation::Allow;
            }
        };

        let decision = match guard {
            RouteGuard::Public => Navigation::Allow,
            RouteGuard::RequiresAuth => self.require_auth().await,
            RouteGuard::AdminOnly => self.require_admin().await,
        };

        info!(path, %guard, ?decision, "Navigation decided");
        decision
    }

    async fn require_auth(&self) -> Navigation {
        match self.cache.check_auth_status().await {
            Ok(status) if status.is_authenticated() => Navigation::Allow,
            Ok(_) => Navigation::redirect(LOGIN_PATH, RedirectReason::NotLoggedIn),
            Err(e) => {
                warn!(error = %e, "Login status check failed, redirecting to login");
                Navigation::redirect(LOGIN_PATH, RedirectReason::CheckFailed)
            }
        }
    }

    /// Always asks the server; the cache is neither read nor written.
    async fn require_admin(&self) -> Navigation {
        match self.cache.source().login_status().await {
            Ok(status) if status.is_admin() => Navigation::Allow,
            Ok(status) if status.is_logged_in => {
                Navigation::redirect(ADMIN_LOGIN_PATH, RedirectReason::Forbidden)
            }
            Ok(_) => Navigation::redirect(ADMIN_LOGIN_PATH, RedirectReason::NotLoggedIn),
            Err(e) => {
                warn!(error = %e, "Admin status check failed, redirecting to admin login");
                Navigation::redirect(ADMIN_LOGIN_PATH, RedirectReason::CheckFailed)
            }
        }
    }
}
