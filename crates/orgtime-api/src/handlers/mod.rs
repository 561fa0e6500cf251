//! HTTP request handlers, grouped by domain.

pub mod auth;
pub mod employee;
pub mod health;
pub mod user;
