//! JWT token issuing, validation, and claims management.

pub mod claims;
pub mod issuer;
pub mod verifier;

pub use claims::{Claims, TokenKind};
pub use issuer::{TokenIssuer, TokenPair};
pub use verifier::TokenVerifier;
