//! Authentication and token configuration.

use serde::{Deserialize, Serialize};

/// Authentication, token, and credential-policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// JWT signing algorithm (`"HS256"`, `"HS384"`, or `"HS512"`).
    #[serde(default = "default_jwt_algorithm")]
    pub jwt_algorithm: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: u64,
    /// Minimum username length.
    #[serde(default = "default_username_min")]
    pub username_min_length: usize,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Safety bound on supervisor-chain depth accepted from the closure
    /// table. Not a limit on organizational depth under normal operation.
    #[serde(default = "default_max_hierarchy_depth")]
    pub max_hierarchy_depth: i32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_algorithm: default_jwt_algorithm(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_days: default_refresh_ttl(),
            username_min_length: default_username_min(),
            password_min_length: default_password_min(),
            max_hierarchy_depth: default_max_hierarchy_depth(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_jwt_algorithm() -> String {
    "HS256".to_string()
}

fn default_access_ttl() -> u64 {
    30
}

fn default_refresh_ttl() -> u64 {
    7
}

fn default_username_min() -> usize {
    4
}

fn default_password_min() -> usize {
    8
}

fn default_max_hierarchy_depth() -> i32 {
    64
}
