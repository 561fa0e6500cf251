//! Employee entity and hierarchy types.

pub mod hierarchy;
pub mod model;

pub use hierarchy::{HierarchyDelta, HierarchyEdge, RankedEmployee};
pub use model::{CreateEmployee, Employee};
