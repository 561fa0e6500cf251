//! `AuthUser` extractor — pulls the bearer token from the Authorization
//! header, validates it, and resolves it to a live user.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use orgtime_core::error::AppError;
use orgtime_entity::user::User;

use crate::state::AppState;

/// Extracted authenticated user available in handlers.
///
/// Resolution already enforced token kind and session-key equality, so a
/// handler holding an `AuthUser` knows the session is live.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    /// Returns the inner `User`.
    pub fn user(&self) -> &User {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = User;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::token_invalid("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::token_invalid("Invalid Authorization header format"))?;

        let user = state.session_manager.authenticate(token).await?;

        Ok(AuthUser(user))
    }
}
