//! JWT token creation with configurable signing and TTL.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

use orgtime_core::config::auth::AuthConfig;
use orgtime_core::error::AppError;
use orgtime_entity::user::User;

use super::claims::{Claims, TokenKind};

/// A freshly issued access + refresh token pair.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: DateTime<Utc>,
}

/// Creates signed JWT access and refresh tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    algorithm: Algorithm,
    access_ttl_minutes: i64,
    refresh_ttl_days: i64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("algorithm", &self.algorithm)
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_days", &self.refresh_ttl_days)
            .finish()
    }
}

impl TokenIssuer {
    /// Creates a new issuer from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            algorithm: parse_algorithm(&config.jwt_algorithm)?,
            access_ttl_minutes: config.access_ttl_minutes as i64,
            refresh_ttl_days: config.refresh_ttl_days as i64,
        })
    }

    /// Issues a new access + refresh token pair for the given user.
    ///
    /// Both tokens carry a snapshot of the user's current session key.
    pub fn issue_pair(&self, user: &User) -> Result<TokenPair, AppError> {
        let now = Utc::now();
        let access_exp = now + chrono::Duration::minutes(self.access_ttl_minutes);
        let refresh_exp = now + chrono::Duration::days(self.refresh_ttl_days);

        let access_token = self.sign(user, now, access_exp, TokenKind::Access)?;
        let refresh_token = self.sign(user, now, refresh_exp, TokenKind::Refresh)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at: access_exp,
            refresh_expires_at: refresh_exp,
        })
    }

    /// Issues a standalone access token (e.g., after a refresh).
    pub fn issue_access(&self, user: &User) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let exp = now + chrono::Duration::minutes(self.access_ttl_minutes);
        let token = self.sign(user, now, exp, TokenKind::Access)?;
        Ok((token, exp))
    }

    fn sign(
        &self,
        user: &User,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        kind: TokenKind,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: user.id,
            key: user.session_key,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            kind,
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode {kind} token: {e}")))
    }
}

/// Parse the configured signing algorithm name.
pub(crate) fn parse_algorithm(name: &str) -> Result<Algorithm, AppError> {
    match name {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(AppError::configuration(format!(
            "Unsupported JWT algorithm '{other}'"
        ))),
    }
}
