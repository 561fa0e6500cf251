//! Unified application error types for Orgtime.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Every kind is recoverable at the
//! request boundary; none should crash the process.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Login or password-change verification failed.
    InvalidCredentials,
    /// Token signature is valid but the embedded session key is stale
    /// (the user logged out everywhere or changed their password).
    SessionRevoked,
    /// Token signature, format, schema, or expiry failure.
    TokenInvalid,
    /// A refresh token was used where an access token was expected, or
    /// vice versa.
    WrongTokenKind,
    /// The requested resource (user, employee) was not found.
    NotFound,
    /// A uniqueness violation (duplicate username, employee already exists).
    Conflict,
    /// Field-level input validation failed.
    Validation,
    /// The caller is not authorized to perform the action.
    NotAuthorized,
    /// A structural hierarchy precondition was violated (duplicate
    /// supervisor assignment, cycle attempt).
    InvalidHierarchyState,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// An internal server error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "INVALID_CREDENTIALS"),
            Self::SessionRevoked => write!(f, "SESSION_REVOKED"),
            Self::TokenInvalid => write!(f, "TOKEN_INVALID"),
            Self::WrongTokenKind => write!(f, "WRONG_TOKEN_KIND"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::NotAuthorized => write!(f, "NOT_AUTHORIZED"),
            Self::InvalidHierarchyState => write!(f, "INVALID_HIERARCHY_STATE"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout Orgtime.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. Messages carry identifying data (ids,
/// usernames) for logging but never password hashes or session keys.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-credentials error with the canonical message.
    ///
    /// The message deliberately does not distinguish an unknown username
    /// from a wrong password.
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorKind::InvalidCredentials, "Invalid username or password")
    }

    /// Create a session-revoked error.
    pub fn session_revoked() -> Self {
        Self::new(ErrorKind::SessionRevoked, "Token has been revoked")
    }

    /// Create a token-invalid error.
    pub fn token_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenInvalid, message)
    }

    /// Create a wrong-token-kind error.
    pub fn wrong_token_kind(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::WrongTokenKind, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a not-authorized error.
    pub fn not_authorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotAuthorized, message)
    }

    /// Create an invalid-hierarchy-state error.
    pub fn invalid_hierarchy(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidHierarchyState, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Internal,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

/// Standard API error response body.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status = match &self.kind {
            ErrorKind::InvalidCredentials
            | ErrorKind::SessionRevoked
            | ErrorKind::TokenInvalid
            | ErrorKind::WrongTokenKind => StatusCode::UNAUTHORIZED,
            ErrorKind::NotAuthorized => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict | ErrorKind::InvalidHierarchyState => StatusCode::CONFLICT,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Database | ErrorKind::Configuration | ErrorKind::Internal => {
                tracing::error!(error = %self, "Internal server error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ApiErrorResponse {
            error: self.kind.to_string(),
            message: self.message.clone(),
        };

        (status, axum::Json(body)).into_response()
    }
}
