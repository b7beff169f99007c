use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// User account record as seen on the wire
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct User {
    /// Unique user identifier, assigned by the service
    #[serde(default)]
    pub id: i64,

    /// Optimistic concurrency version, bumped on every update
    #[serde(default)]
    pub resource_version: i64,

    /// Login name (required)
    #[validate(length(min = 1, max = 128, message = "name must be between 1 and 128 characters"))]
    pub name: String,

    /// Plain text password; accepted on input, never written back out
    #[serde(default, skip_serializing)]
    pub password: String,

    #[serde(default)]
    pub status: i32,

    /// Role for RBAC (e.g. "user", "admin")
    #[serde(default)]
    pub role: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gmt_create: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gmt_modified: Option<DateTime<Utc>>,
}

/// Login result with bearer token
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user_id: i64,
    pub role: String,
}
