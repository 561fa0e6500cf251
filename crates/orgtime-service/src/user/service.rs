//! User queries and account management on top of the authorization
//! policy.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use orgtime_auth::policy::{AccessPolicy, ListingScope};
use orgtime_core::error::{AppError, ErrorKind};
use orgtime_core::result::AppResult;
use orgtime_core::types::pagination::{PageRequest, PageResponse};
use orgtime_database::repositories::employee::EmployeeRepository;
use orgtime_database::repositories::user::{UserEmployeePair, UserRepository};
use orgtime_entity::user::User;

use crate::employee::EmployeeService;

/// Service for user lookups, visibility-scoped listing, and deletion.
#[derive(Debug, Clone)]
pub struct UserService {
    pool: PgPool,
    user_repo: Arc<UserRepository>,
    employee_repo: Arc<EmployeeRepository>,
    employee_service: Arc<EmployeeService>,
    access_policy: Arc<AccessPolicy>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        pool: PgPool,
        user_repo: Arc<UserRepository>,
        employee_repo: Arc<EmployeeRepository>,
        employee_service: Arc<EmployeeService>,
        access_policy: Arc<AccessPolicy>,
    ) -> Self {
        Self {
            pool,
            user_repo,
            employee_repo,
            employee_service,
            access_policy,
        }
    }

    /// Fetches a user with its optional employee record, enforcing read
    /// visibility for the actor.
    pub async fn get_user(&self, actor: &User, target_id: Uuid) -> AppResult<UserEmployeePair> {
        let target = self
            .user_repo
            .find_by_id(target_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User '{target_id}' not found")))?;

        if !self.access_policy.can_read(actor, &target).await? {
            return Err(AppError::not_authorized(format!(
                "Not authorized to view user '{target_id}'"
            )));
        }

        let employee = self.employee_repo.find_by_user_id(target.id).await?;
        Ok((target, employee))
    }

    /// Lists the users visible to the actor, paginated.
    ///
    /// Superusers see everyone; employees see themselves plus their
    /// strict descendants; everyone else sees only themselves.
    pub async fn visible_users(
        &self,
        actor: &User,
        page: &PageRequest,
    ) -> AppResult<PageResponse<UserEmployeePair>> {
        let actor_employee = self.employee_repo.find_by_user_id(actor.id).await?;

        match AccessPolicy::listing_scope(actor, actor_employee.as_ref()) {
            ListingScope::All => self.user_repo.list_with_employees(page).await,
            ListingScope::Subtree(employee_id) => {
                self.user_repo
                    .list_subordinates_with_users(employee_id, true, page)
                    .await
            }
            ListingScope::SelfOnly(_) => Ok(PageResponse::new(
                vec![(actor.clone(), actor_employee)],
                page.page,
                page.page_size,
                1,
            )),
        }
    }

    /// Deletes a user account. Superusers only.
    ///
    /// When the user owns an employee record, the employee is removed
    /// from the hierarchy first (its direct reports become new roots) in
    /// the same transaction as the user row deletion.
    pub async fn delete_user(&self, actor: &User, target_id: Uuid) -> AppResult<()> {
        if !actor.is_superuser {
            return Err(AppError::not_authorized(
                "Only superusers may delete accounts",
            ));
        }

        let target = self
            .user_repo
            .find_by_id(target_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User '{target_id}' not found")))?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        if self
            .employee_repo
            .find_by_user_id(target.id)
            .await?
            .is_some()
        {
            self.employee_service
                .remove_employee_in(&mut tx, target.id)
                .await?;
        }

        self.user_repo.delete(&mut tx, target.id).await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        info!(user_id = %target.id, username = %target.username, "Deleted user");
        Ok(())
    }
}
