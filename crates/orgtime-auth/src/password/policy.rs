//! Username and password policy enforcement.
//!
//! Keep these rules in sync with any client-side validation.

use orgtime_core::config::auth::AuthConfig;
use orgtime_core::error::AppError;

/// Validates usernames and passwords against the configured rules.
#[derive(Debug, Clone)]
pub struct CredentialPolicy {
    username_min_length: usize,
    password_min_length: usize,
}

impl CredentialPolicy {
    /// Creates a new policy from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            username_min_length: config.username_min_length,
            password_min_length: config.password_min_length,
        }
    }

    /// Validates a username for registration.
    pub fn validate_username(&self, username: &str) -> Result<(), AppError> {
        if username.is_empty() {
            return Err(AppError::validation("Username cannot be empty"));
        }
        if username.chars().count() < self.username_min_length {
            return Err(AppError::validation(format!(
                "Username must be at least {} characters",
                self.username_min_length
            )));
        }
        if username.contains(' ') {
            return Err(AppError::validation("Username cannot contain spaces"));
        }
        Ok(())
    }

    /// Validates a password for creation or update.
    pub fn validate_password(&self, password: &str) -> Result<(), AppError> {
        if password.is_empty() {
            return Err(AppError::validation("Password cannot be empty"));
        }
        if password.chars().count() < self.password_min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                self.password_min_length
            )));
        }
        Ok(())
    }

    /// Validates that a new password differs from the current one.
    pub fn validate_not_same(&self, current: &str, new: &str) -> Result<(), AppError> {
        if current == new {
            return Err(AppError::validation(
                "New password must differ from current password",
            ));
        }
        Ok(())
    }
}
