//! Employee entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An organizational employee record, keyed 1:1 with a user.
///
/// The supervisor graph is a forest: no cycles, at most one parent per
/// node. `supervisor_id` is set and cleared only through the hierarchy
/// store so the closure table stays consistent with it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employee {
    /// The owning user's id (primary key).
    pub user_id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Immediate supervisor, if any.
    pub supervisor_id: Option<Uuid>,
}

impl Employee {
    /// Whether this employee currently has a supervisor assigned.
    pub fn has_supervisor(&self) -> bool {
        self.supervisor_id.is_some()
    }
}

/// Data required to create a new employee record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEmployee {
    /// The user acquiring an employee role.
    pub user_id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}
