//! The navigation layer: one client, one auth cache, one guard.
//!
//! [`Session`] is what an application holds for its lifetime. It owns the
//! only [`AuthCache`] and keeps it consistent with login and logout.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::auth::AuthCache;
use crate::client::TimelineClient;
use crate::clock::Clock;
use crate::error::Result;
use crate::router::{Navigation, NavigationGuard, RouteTable};
use crate::types::{LoginResponse, LoginStatus, MessageResponse, RegisterRequest};

/// Client plus cached auth state and route guard.
#[derive(Debug, Clone)]
pub struct Session {
    client: TimelineClient,
    guard: NavigationGuard,
}

impl Session {
    /// Session with the default route table, TTL and clock.
    pub fn new(client: TimelineClient) -> Self {
        let cache = AuthCache::new(Arc::new(client.clone()));
        Self::with_cache(client, RouteTable::timeline(), cache)
    }

    /// Session around a pre-built cache and route table.
    pub fn with_cache(client: TimelineClient, routes: RouteTable, cache: AuthCache) -> Self {
        Self {
            guard: NavigationGuard::new(routes, Arc::new(cache)),
            client,
        }
    }

    /// Session whose cache uses a custom TTL and clock.
    pub fn with_clock(client: TimelineClient, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let cache = AuthCache::new(Arc::new(client.clone()))
            .with_ttl(ttl)
            .with_clock(clock);
        Self::with_cache(client, RouteTable::timeline(), cache)
    }

    pub fn client(&self) -> &TimelineClient {
        &self.client
    }

    pub fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    pub fn cache(&self) -> &Arc<AuthCache> {
        self.guard.cache()
    }

    /// Cached login status.
    pub async fn check_auth_status(&self) -> Result<LoginStatus> {
        self.cache().check_auth_status().await
    }

    /// Drop the cached login status.
    pub fn clear_auth_cache(&self) {
        self.cache().clear();
    }

    /// Decide a navigation.
    pub async fn navigate(&self, path: &str) -> Navigation {
        self.guard.navigate(path).await
    }

    /// Log in and invalidate the cached status.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let response = self.client.auth().login(username, password).await?;
        self.clear_auth_cache();
        info!(username, "Logged in");
        Ok(response)
    }

    /// Log out; the cache is cleared only once the server confirms.
    pub async fn logout(&self) -> Result<MessageResponse> {
        let response = self.client.auth().logout().await?;
        self.clear_auth_cache();
        info!("Logged out");
        Ok(response)
    }

    /// Register a new account. Does not log in.
    pub async fn register(&self, request: RegisterRequest) -> Result<MessageResponse> {
        self.client.auth().register(request).await
    }
}
