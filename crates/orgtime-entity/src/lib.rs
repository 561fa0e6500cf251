//! # orgtime-entity
//!
//! Domain entities shared across the Orgtime crates: user identity records,
//! employee records, and the closure-table hierarchy edge.

pub mod employee;
pub mod user;

pub use employee::{Employee, HierarchyDelta, HierarchyEdge, RankedEmployee};
pub use user::User;
