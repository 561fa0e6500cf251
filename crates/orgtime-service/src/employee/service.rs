//! Employee lifecycle and hierarchy orchestration.
//!
//! All supervisor-link mutations run inside a single transaction with the
//! affected employee rows locked `FOR UPDATE`: the edge counts and depths
//! computed during a mutation depend on the pre-mutation snapshot of both
//! subtrees, so overlapping mutations must be serialized.

use std::sync::Arc;

use sqlx::postgres::PgConnection;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use orgtime_core::error::{AppError, ErrorKind};
use orgtime_core::result::AppResult;
use orgtime_database::repositories::employee::EmployeeRepository;
use orgtime_database::repositories::hierarchy::{cross_edges, HierarchyRepository};
use orgtime_database::repositories::user::UserRepository;
use orgtime_entity::employee::{CreateEmployee, Employee, HierarchyDelta, RankedEmployee};

/// Service for employee records and the supervisor hierarchy.
#[derive(Debug, Clone)]
pub struct EmployeeService {
    pool: PgPool,
    user_repo: Arc<UserRepository>,
    employee_repo: Arc<EmployeeRepository>,
    hierarchy_repo: Arc<HierarchyRepository>,
    max_hierarchy_depth: i32,
}

impl EmployeeService {
    /// Creates a new employee service.
    pub fn new(
        pool: PgPool,
        user_repo: Arc<UserRepository>,
        employee_repo: Arc<EmployeeRepository>,
        hierarchy_repo: Arc<HierarchyRepository>,
        max_hierarchy_depth: i32,
    ) -> Self {
        Self {
            pool,
            user_repo,
            employee_repo,
            hierarchy_repo,
            max_hierarchy_depth,
        }
    }

    /// Creates an employee record for an existing user, together with its
    /// depth-0 self edge, in one transaction.
    pub async fn create_employee(&self, data: &CreateEmployee) -> AppResult<Employee> {
        if self.user_repo.find_by_id(data.user_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "User '{}' not found",
                data.user_id
            )));
        }
        if self
            .employee_repo
            .find_by_user_id(data.user_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "Employee already exists for user {}",
                data.user_id
            )));
        }

        let mut tx = self.begin().await?;
        let employee = self.employee_repo.create(&mut tx, data).await?;
        self.hierarchy_repo
            .insert_self_edge(&mut tx, employee.user_id)
            .await?;
        self.commit(tx).await?;

        info!(user_id = %employee.user_id, "Created employee");
        Ok(employee)
    }

    /// Looks up an employee, failing with `NotFound` when absent.
    pub async fn get_employee(&self, user_id: Uuid) -> AppResult<Employee> {
        self.employee_repo
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Employee '{user_id}' not found")))
    }

    /// Assigns `supervisor_id` as the supervisor of `target_id`.
    ///
    /// Fails with `InvalidHierarchyState` when the target already has a
    /// supervisor, or when the assignment would create a cycle (the
    /// supervisor is already a descendant of the target). On success the
    /// closure table gains the full ancestor x descendant cross product
    /// and the supervisor pointer is set — all in one transaction.
    pub async fn assign_supervisor(&self, target_id: Uuid, supervisor_id: Uuid) -> AppResult<()> {
        if target_id == supervisor_id {
            return Err(AppError::invalid_hierarchy(format!(
                "Employee '{target_id}' cannot supervise itself"
            )));
        }

        let mut tx = self.begin().await?;

        // Lock both rows in id order so two overlapping assignments
        // cannot deadlock each other.
        let target = if target_id <= supervisor_id {
            let target = self.employee_repo.lock_for_update(&mut tx, target_id).await?;
            self.employee_repo
                .lock_for_update(&mut tx, supervisor_id)
                .await?;
            target
        } else {
            self.employee_repo
                .lock_for_update(&mut tx, supervisor_id)
                .await?;
            self.employee_repo.lock_for_update(&mut tx, target_id).await?
        };
        if target.has_supervisor() {
            return Err(AppError::invalid_hierarchy(format!(
                "Employee '{target_id}' already has a supervisor"
            )));
        }

        // Cycle check: the supervisor must not sit below the target. An
        // undetected cycle would corrupt the closure table with
        // contradictory depths.
        if self
            .hierarchy_repo
            .is_ancestor_of(&mut tx, target_id, supervisor_id)
            .await?
        {
            return Err(AppError::invalid_hierarchy(format!(
                "Employee '{supervisor_id}' is a subordinate of '{target_id}'; assignment would create a cycle"
            )));
        }

        // Both lists come back ordered by ascending depth; the recorded
        // depths, not the positions, feed the new edge depths.
        let ancestors = self
            .hierarchy_repo
            .ancestor_ids(&mut tx, supervisor_id, true)
            .await?;
        let descendants = self
            .hierarchy_repo
            .descendant_ids(&mut tx, target_id, true)
            .await?;

        let edges = cross_edges(&ancestors, &descendants);
        self.hierarchy_repo.insert_edges(&mut tx, &edges).await?;
        self.employee_repo
            .set_supervisor(&mut tx, target_id, Some(supervisor_id))
            .await?;

        self.commit(tx).await?;

        info!(
            target = %target_id,
            supervisor = %supervisor_id,
            edges = edges.len(),
            "Assigned supervisor"
        );
        Ok(())
    }

    /// Clears the supervisor link of `target_id`.
    ///
    /// A no-op when no supervisor is set (idempotent). Otherwise deletes
    /// exactly the closure edges crossing the severed link and clears the
    /// pointer, in one transaction.
    pub async fn remove_supervisor(&self, target_id: Uuid) -> AppResult<()> {
        let mut tx = self.begin().await?;

        let target = self.employee_repo.lock_for_update(&mut tx, target_id).await?;
        if !target.has_supervisor() {
            return Ok(());
        }

        self.detach_in(&mut tx, target_id).await?;
        self.commit(tx).await?;

        info!(target = %target_id, "Removed supervisor");
        Ok(())
    }

    /// Severs the link above `target_id` inside an open transaction:
    /// deletes every edge whose ancestor is strictly above the target and
    /// whose descendant is at or below it, then clears the pointer.
    ///
    /// The caller owns the transaction and must hold the target's row
    /// lock.
    pub async fn detach_in(&self, conn: &mut PgConnection, target_id: Uuid) -> AppResult<()> {
        let upper: Vec<Uuid> = self
            .hierarchy_repo
            .ancestor_ids(conn, target_id, false)
            .await?
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        let lower: Vec<Uuid> = self
            .hierarchy_repo
            .descendant_ids(conn, target_id, true)
            .await?
            .into_iter()
            .map(|(id, _)| id)
            .collect();

        self.hierarchy_repo
            .delete_crossing_edges(conn, &upper, &lower)
            .await?;
        self.employee_repo
            .set_supervisor(conn, target_id, None)
            .await?;
        Ok(())
    }

    /// Removes an employee from the hierarchy and deletes its record,
    /// inside an open transaction. Direct reports are detached first so
    /// their subtrees survive as new roots.
    pub async fn remove_employee_in(
        &self,
        conn: &mut PgConnection,
        target_id: Uuid,
    ) -> AppResult<()> {
        let target = self.employee_repo.lock_for_update(conn, target_id).await?;

        if target.has_supervisor() {
            self.detach_in(conn, target_id).await?;
        }

        let reports: Vec<Uuid> = self
            .hierarchy_repo
            .descendant_ids(conn, target_id, false)
            .await?
            .into_iter()
            .filter(|(_, depth)| *depth == 1)
            .map(|(id, _)| id)
            .collect();
        for report_id in reports {
            self.employee_repo.lock_for_update(conn, report_id).await?;
            self.detach_in(conn, report_id).await?;
        }

        // Only the self edge remains; it cascades with the row.
        self.employee_repo.delete(conn, target_id).await?;
        Ok(())
    }

    /// Ancestors of `target_id`, ordered by ascending depth.
    pub async fn get_ancestors(
        &self,
        target_id: Uuid,
        include_self: bool,
    ) -> AppResult<Vec<RankedEmployee>> {
        self.get_employee(target_id).await?;
        self.hierarchy_repo
            .get_ancestors(target_id, include_self)
            .await
    }

    /// Descendants of `target_id`, ordered by ascending depth.
    pub async fn get_descendants(
        &self,
        target_id: Uuid,
        include_self: bool,
    ) -> AppResult<Vec<RankedEmployee>> {
        self.get_employee(target_id).await?;
        self.hierarchy_repo
            .get_descendants(target_id, include_self)
            .await
    }

    /// Relative hierarchy position of `a` with respect to `b`.
    pub async fn hierarchy_delta(&self, a: Uuid, b: Uuid) -> AppResult<HierarchyDelta> {
        self.hierarchy_repo
            .hierarchy_delta(a, b, self.max_hierarchy_depth)
            .await
    }

    async fn begin(&self) -> AppResult<sqlx::Transaction<'static, sqlx::Postgres>> {
        self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })
    }

    async fn commit(&self, tx: sqlx::Transaction<'static, sqlx::Postgres>) -> AppResult<()> {
        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })
    }
}
