//! # orgtime-database
//!
//! PostgreSQL connection management, embedded migrations, and repository
//! implementations for the Orgtime backend.
//!
//! Read paths go through pool-backed repositories. Hierarchy mutations
//! instead take an explicit `&mut PgConnection` transaction handle whose
//! commit/rollback boundary is owned by the service layer, so a failed
//! mutation never leaves the closure table inconsistent with the
//! supervisor pointers.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
