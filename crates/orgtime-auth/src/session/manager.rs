//! Session lifecycle manager — register, login, refresh, logout-all, and
//! password-change flows.
//!
//! Every issued token carries a snapshot of the user's session key.
//! Rotating that key (logout-all, password change) makes every
//! previously issued token fail resolution immediately; there is no
//! per-token revocation list to maintain.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use orgtime_core::error::AppError;
use orgtime_database::repositories::user::UserRepository;
use orgtime_entity::user::{CreateUser, User};

use crate::jwt::{Claims, TokenIssuer, TokenKind, TokenPair, TokenVerifier};
use crate::password::{CredentialPolicy, PasswordHasher};

/// Result of a successful registration or login.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AuthenticatedUser {
    /// The authenticated user.
    pub user: User,
    /// Generated token pair.
    pub tokens: TokenPair,
}

/// Manages the complete session lifecycle.
#[derive(Debug, Clone)]
pub struct SessionManager {
    user_repo: Arc<UserRepository>,
    issuer: Arc<TokenIssuer>,
    verifier: Arc<TokenVerifier>,
    hasher: Arc<PasswordHasher>,
    policy: CredentialPolicy,
}

impl SessionManager {
    /// Creates a new session manager with all required dependencies.
    pub fn new(
        user_repo: Arc<UserRepository>,
        issuer: Arc<TokenIssuer>,
        verifier: Arc<TokenVerifier>,
        hasher: Arc<PasswordHasher>,
        policy: CredentialPolicy,
    ) -> Self {
        Self {
            user_repo,
            issuer,
            verifier,
            hasher,
            policy,
        }
    }

    /// Registers a new user and issues its first token pair.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AppError> {
        self.policy.validate_username(username)?;
        self.policy.validate_password(password)?;

        if self.user_repo.find_by_username(username).await?.is_some() {
            return Err(AppError::conflict(format!(
                "User '{username}' already exists"
            )));
        }

        let user = self
            .user_repo
            .create(&CreateUser {
                username: username.to_string(),
                password_hash: self.hasher.hash_password(password)?,
                is_superuser: false,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "Registered new user");

        let tokens = self.issuer.issue_pair(&user)?;
        Ok(AuthenticatedUser { user, tokens })
    }

    /// Performs the login flow: verify credentials, then issue a token
    /// pair. An unknown username and a wrong password produce the same
    /// error.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AppError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(AppError::invalid_credentials)?;

        if !self.hasher.verify_password(password, &user.password_hash)? {
            return Err(AppError::invalid_credentials());
        }

        info!(user_id = %user.id, "User logged in");

        let tokens = self.issuer.issue_pair(&user)?;
        Ok(AuthenticatedUser { user, tokens })
    }

    /// Exchanges a valid refresh token for a new access token.
    ///
    /// The refresh token itself is not rotated: a refresh yields a new
    /// access token only, and the original refresh token stays valid
    /// until its expiry or a session-key rotation.
    pub async fn refresh(
        &self,
        refresh_token: &str,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let claims = self.verifier.decode(refresh_token)?;
        self.verifier.expect_kind(&claims, TokenKind::Refresh)?;
        let user = self.resolve_user(&claims).await?;

        self.issuer.issue_access(&user)
    }

    /// Authenticates a bearer access token, resolving it to a live user.
    pub async fn authenticate(&self, access_token: &str) -> Result<User, AppError> {
        let claims = self.verifier.decode(access_token)?;
        self.verifier.expect_kind(&claims, TokenKind::Access)?;
        self.resolve_user(&claims).await
    }

    /// Resolves token claims to a user, enforcing session-key equality.
    pub async fn resolve_user(&self, claims: &Claims) -> Result<User, AppError> {
        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User '{}' not found", claims.sub)))?;

        if user.session_key != claims.key {
            return Err(AppError::session_revoked());
        }

        Ok(user)
    }

    /// Invalidates every outstanding token for the user by rotating the
    /// session key.
    pub async fn logout_all(&self, user_id: Uuid) -> Result<(), AppError> {
        self.user_repo.rotate_session_key(user_id).await?;
        info!(user_id = %user_id, "Rotated session key; all tokens revoked");
        Ok(())
    }

    /// Changes the user's password.
    ///
    /// Verifies the current password, enforces the password policy,
    /// rejects a no-op change, then stores the new hash and rotates the
    /// session key in one statement — a password change implies a global
    /// logout.
    pub async fn change_password(
        &self,
        user: &User,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if !self
            .hasher
            .verify_password(current_password, &user.password_hash)?
        {
            return Err(AppError::invalid_credentials());
        }

        self.policy.validate_password(new_password)?;
        self.policy.validate_not_same(current_password, new_password)?;

        let new_hash = self.hasher.hash_password(new_password)?;
        self.user_repo
            .update_password_and_rotate_key(user.id, &new_hash)
            .await?;

        info!(user_id = %user.id, "Password changed; all tokens revoked");
        Ok(())
    }
}
