//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered user in the Orgtime system.
///
/// Owns zero-or-one [`Employee`](crate::employee::Employee) record keyed by
/// the same id. The `session_key` is an opaque rotating value embedded in
/// every issued token; rotating it invalidates all outstanding tokens.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Opaque rotating session key. Regenerated on logout-all and on
    /// password change; never exposed over the API.
    #[serde(skip_serializing)]
    pub session_key: Uuid,
    /// Whether the user has superuser privileges.
    pub is_superuser: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Desired username.
    pub username: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Whether the new user is a superuser.
    pub is_superuser: bool,
}
