//! # orgtime-service
//!
//! Domain services sitting between the HTTP surface and the
//! repositories. Services own transaction boundaries: every hierarchy
//! mutation runs as one atomic transaction, with the repositories
//! operating on the explicit connection handle the service passes in.

pub mod employee;
pub mod user;

pub use employee::EmployeeService;
pub use user::UserService;
