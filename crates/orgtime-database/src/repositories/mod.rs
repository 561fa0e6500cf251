//! Repository implementations.

pub mod employee;
pub mod hierarchy;
pub mod user;
