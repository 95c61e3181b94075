//! Request and response types for the Timeline Notebook API.
//!
//! These types mirror the server's API contract.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Role name that grants access to the admin dashboard.
pub const ADMIN_ROLE: &str = "admin";

// ─────────────────────────────────────────────────────────────────────────────
// Auth
// ─────────────────────────────────────────────────────────────────────────────

/// The signed-in user as reported by the session endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    /// User ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Role (`"admin"` or `"user"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Any other fields the server includes.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl UserRef {
    /// Whether this user carries the admin role.
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }
}

/// Response of `GET /login-status`.
///
/// The server omits `user` entirely when nobody is logged in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginStatus {
    pub is_logged_in: bool,
    #[serde(default)]
    pub user: Option<UserRef>,
}

impl LoginStatus {
    /// The logged-out state.
    pub fn logged_out() -> Self {
        Self {
            is_logged_in: false,
            user: None,
        }
    }

    /// Logged in with a user attached.
    pub fn is_authenticated(&self) -> bool {
        self.is_logged_in && self.user.is_some()
    }

    /// Logged in as an admin.
    pub fn is_admin(&self) -> bool {
        self.is_logged_in && self.user.as_ref().is_some_and(UserRef::is_admin)
    }
}

/// Request body for `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response of `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<UserRef>,
}

/// Request body for `POST /register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Generic `{ "message": "..." }` acknowledgement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Health
// ─────────────────────────────────────────────────────────────────────────────

/// Response of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"healthy"` or `"unhealthy"`.
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub environment: Option<String>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_status_without_user_field() {
        let status: LoginStatus = serde_json::from_str(r#"{"is_logged_in": false}"#).unwrap();
        assert_eq!(status, LoginStatus::logged_out());
        assert!(!status.is_authenticated());
    }

    #[test]
    fn test_login_status_admin() {
        let status: LoginStatus = serde_json::from_str(
            r#"{"is_logged_in": true, "user": {"id": 1, "username": "root", "role": "admin"}}"#,
        )
        .unwrap();
        assert!(status.is_authenticated());
        assert!(status.is_admin());
        assert_eq!(status.user.unwrap().username.as_deref(), Some("root"));
    }

    #[test]
    fn test_login_status_logged_in_without_user_is_not_authenticated() {
        let status: LoginStatus =
            serde_json::from_str(r#"{"is_logged_in": true, "user": null}"#).unwrap();
        assert!(!status.is_authenticated());
        assert!(!status.is_admin());
    }

    #[test]
    fn test_user_ref_keeps_extra_fields() {
        let user: UserRef =
            serde_json::from_str(r#"{"role": "user", "avatar_url": "/static/a.png"}"#).unwrap();
        assert!(!user.is_admin());
        assert_eq!(user.extra["avatar_url"], "/static/a.png");
    }

    #[test]
    fn test_health_is_healthy() {
        let health: HealthResponse =
            serde_json::from_str(r#"{"status": "healthy", "version": "1.0.0"}"#).unwrap();
        assert!(health.is_healthy());
    }
}
