//! Request DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registration request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Desired username.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// Login request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// Token refresh request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token issued at login.
    pub refresh_token: String,
}

/// Password change request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    /// Current password, re-verified before the change.
    pub current_password: String,
    /// Replacement password.
    pub new_password: String,
}

/// Employee creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEmployeeRequest {
    /// Id of the user the employee record belongs to.
    pub user_id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

/// Supervisor assignment request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignSupervisorRequest {
    /// Id of the supervising employee.
    pub supervisor_id: Uuid,
}
