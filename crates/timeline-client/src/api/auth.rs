//! Auth API.

use crate::client::TimelineClient;
use crate::endpoints;
use crate::error::Result;
use crate::types::{LoginRequest, LoginResponse, LoginStatus, MessageResponse, RegisterRequest};

/// Auth API client.
///
/// These calls go straight to the server. Navigation code should read login
/// state through [`AuthCache`](crate::AuthCache) instead of calling
/// [`status`](Self::status) directly.
pub struct AuthApi {
    client: TimelineClient,
}

impl AuthApi {
    pub(crate) fn new(client: TimelineClient) -> Self {
        Self { client }
    }

    /// Fetch the current session's login status (uncached).
    pub async fn status(&self) -> Result<LoginStatus> {
        self.client.get(endpoints::LOGIN_STATUS).await
    }

    /// Log in; the server sets a session cookie on success.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.client.post(endpoints::LOGIN, &request).await
    }

    /// End the current session.
    pub async fn logout(&self) -> Result<MessageResponse> {
        self.client.post(endpoints::LOGOUT, &serde_json::json!({})).await
    }

    /// Create a new account.
    pub async fn register(&self, request: RegisterRequest) -> Result<MessageResponse> {
        self.client.post(endpoints::REGISTER, &request).await
    }
}
