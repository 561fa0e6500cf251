//! Employee and hierarchy services.

pub mod service;

pub use service::EmployeeService;
