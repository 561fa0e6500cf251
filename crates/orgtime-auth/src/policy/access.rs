//! Read/write visibility rules.
//!
//! Read access follows the reporting chain downwards: a supervisor can
//! see everyone at or below them. Write access deliberately does not —
//! hierarchy position never grants write access, only superuser status
//! or being the target yourself.

use std::sync::Arc;

use orgtime_core::error::AppError;
use orgtime_database::repositories::employee::EmployeeRepository;
use orgtime_database::repositories::hierarchy::HierarchyRepository;
use orgtime_entity::employee::Employee;
use orgtime_entity::user::User;
use uuid::Uuid;

/// The slice of users an actor may list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingScope {
    /// Superusers see every user.
    All,
    /// Employees see themselves and their strict descendants.
    Subtree(Uuid),
    /// Everyone else sees only themselves.
    SelfOnly(Uuid),
}

/// Derives read/write visibility from hierarchy position and the
/// superuser flag.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    employee_repo: Arc<EmployeeRepository>,
    hierarchy_repo: Arc<HierarchyRepository>,
    max_hierarchy_depth: i32,
}

impl AccessPolicy {
    /// Creates a new access policy.
    pub fn new(
        employee_repo: Arc<EmployeeRepository>,
        hierarchy_repo: Arc<HierarchyRepository>,
        max_hierarchy_depth: i32,
    ) -> Self {
        Self {
            employee_repo,
            hierarchy_repo,
            max_hierarchy_depth,
        }
    }

    /// Whether `actor` may read `target`'s data: superuser, self, or an
    /// ancestor-or-self of the target in the hierarchy.
    pub async fn can_read(&self, actor: &User, target: &User) -> Result<bool, AppError> {
        if actor.is_superuser || actor.id == target.id {
            return Ok(true);
        }

        let actor_employee = self.employee_repo.find_by_user_id(actor.id).await?;
        let target_employee = self.employee_repo.find_by_user_id(target.id).await?;

        match (actor_employee, target_employee) {
            (Some(actor_emp), Some(target_emp)) => {
                let delta = self
                    .hierarchy_repo
                    .hierarchy_delta(
                        actor_emp.user_id,
                        target_emp.user_id,
                        self.max_hierarchy_depth,
                    )
                    .await?;
                Ok(delta.is_ancestor_or_self())
            }
            _ => Ok(false),
        }
    }

    /// Whether `actor` may modify `target`'s data: superuser or self only.
    pub fn can_write(actor: &User, target: &User) -> bool {
        actor.is_superuser || actor.id == target.id
    }

    /// The listing scope for a visible-user query.
    pub fn listing_scope(actor: &User, actor_employee: Option<&Employee>) -> ListingScope {
        if actor.is_superuser {
            ListingScope::All
        } else if let Some(employee) = actor_employee {
            ListingScope::Subtree(employee.user_id)
        } else {
            ListingScope::SelfOnly(actor.id)
        }
    }
}
