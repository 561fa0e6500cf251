//! JWT token validation.

use jsonwebtoken::{DecodingKey, Validation, decode};

use orgtime_core::config::auth::AuthConfig;
use orgtime_core::error::AppError;

use super::claims::{Claims, TokenKind};
use super::issuer::parse_algorithm;

/// Validates JWT tokens against the shared secret.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    /// Creates a new verifier from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let mut validation = Validation::new(parse_algorithm(&config.jwt_algorithm)?);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew
        validation.required_spec_claims.clear();

        Ok(Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        })
    }

    /// Decodes and validates a token string.
    ///
    /// Any failure — bad signature, malformed payload, schema mismatch,
    /// or expiry — yields a `TokenInvalid` error; this never panics.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::token_invalid("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::token_invalid("Invalid token signature")
                    }
                    _ => AppError::token_invalid("Invalid authentication credentials"),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Requires the claims to carry the expected token kind.
    pub fn expect_kind(&self, claims: &Claims, expected: TokenKind) -> Result<(), AppError> {
        if claims.kind != expected {
            return Err(AppError::wrong_token_kind(format!(
                "Expected {expected} token, got {} token",
                claims.kind
            )));
        }
        Ok(())
    }
}
