//! # orgtime-auth
//!
//! Authentication and authorization for the Orgtime backend.
//!
//! ## Modules
//!
//! - `jwt` — claims shape, token issuing, and validation
//! - `password` — Argon2id hashing and credential policy rules
//! - `session` — session lifecycle orchestration (register, login,
//!   refresh, logout-all, password change)
//! - `policy` — read/write visibility derived from hierarchy position

pub mod jwt;
pub mod password;
pub mod policy;
pub mod session;

pub use jwt::{Claims, TokenIssuer, TokenKind, TokenPair, TokenVerifier};
pub use password::{CredentialPolicy, PasswordHasher};
pub use policy::AccessPolicy;
pub use session::SessionManager;
