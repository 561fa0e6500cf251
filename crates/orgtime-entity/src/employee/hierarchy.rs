//! Closure-table hierarchy types.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::model::Employee;

/// One row of the `employee_hierarchy` closure table.
///
/// The table stores every (ancestor, descendant, depth) triple implied by
/// the supervisor forest: a depth-0 self edge per employee, plus an edge
/// for every ancestor/descendant pair at its cumulative depth. This makes
/// subtree and ancestor queries plain range scans with no recursion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct HierarchyEdge {
    /// The ancestor employee id.
    pub ancestor_id: Uuid,
    /// The descendant employee id.
    pub descendant_id: Uuid,
    /// Number of supervisor hops between ancestor and descendant.
    pub depth: i32,
}

/// An employee together with its closure depth relative to a query root.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RankedEmployee {
    /// The employee record.
    #[sqlx(flatten)]
    pub employee: Employee,
    /// Supervisor hops from the query root to this employee.
    pub depth: i32,
}

/// Relative hierarchy position of one employee with respect to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "relation", content = "depth")]
pub enum HierarchyDelta {
    /// Both ids refer to the same employee.
    Same,
    /// The first employee is an ancestor of the second, `d` hops above.
    Ancestor(i32),
    /// The first employee is a descendant of the second, `d` hops below.
    Descendant(i32),
    /// The employees share no ancestor/descendant relation.
    Unrelated,
}

impl HierarchyDelta {
    /// Signed depth difference: positive above, negative below, zero for
    /// the same employee. `None` when unrelated.
    pub fn signed(&self) -> Option<i32> {
        match self {
            Self::Same => Some(0),
            Self::Ancestor(d) => Some(*d),
            Self::Descendant(d) => Some(-d),
            Self::Unrelated => None,
        }
    }

    /// Whether the first employee is at or above the second.
    pub fn is_ancestor_or_self(&self) -> bool {
        matches!(self, Self::Same | Self::Ancestor(_))
    }
}
