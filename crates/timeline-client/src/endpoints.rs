//! API endpoint paths, relative to the API base URL.

pub const HEALTH: &str = "/health";

pub const LOGIN: &str = "/login";
pub const LOGOUT: &str = "/logout";
pub const REGISTER: &str = "/register";
pub const LOGIN_STATUS: &str = "/login-status";
