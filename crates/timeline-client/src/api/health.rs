//! Health API.

use crate::client::TimelineClient;
use crate::endpoints;
use crate::error::Result;
use crate::types::HealthResponse;

/// Health API client.
///
/// The health endpoint does not require a session.
pub struct HealthApi {
    client: TimelineClient,
}

impl HealthApi {
    pub(crate) fn new(client: TimelineClient) -> Self {
        Self { client }
    }

    /// Check server health.
    ///
    /// An unhealthy server answers 500, which surfaces as an error.
    pub async fn check(&self) -> Result<HealthResponse> {
        self.client.get(endpoints::HEALTH).await
    }

    /// Simple connectivity check - returns true if server is reachable and healthy.
    pub async fn is_healthy(&self) -> bool {
        self.check().await.is_ok_and(|h| h.is_healthy())
    }
}
