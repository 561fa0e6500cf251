//! Maps domain `AppError` to HTTP responses.
//!
//! The `IntoResponse` impl for `AppError` lives in `orgtime-core` next to
//! the type itself (the orphan rule forbids implementing it here); this
//! module re-exports the response body type for API consumers.

pub use orgtime_core::error::ApiErrorResponse;
