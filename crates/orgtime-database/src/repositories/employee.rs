//! Employee repository implementation.
//!
//! Mutations take an explicit `&mut PgConnection` so they always run inside
//! a transaction owned by the service layer. The supervisor pointer is
//! never written outside a hierarchy operation.

use sqlx::postgres::PgConnection;
use sqlx::PgPool;
use uuid::Uuid;

use orgtime_core::error::{AppError, ErrorKind};
use orgtime_core::result::AppResult;
use orgtime_entity::employee::{CreateEmployee, Employee};

/// Repository for employee records.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    /// Create a new employee repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an employee by its owning user id.
    pub async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<Employee>> {
        sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find employee", e))
    }

    /// Insert a new employee row inside an open transaction.
    pub async fn create(
        &self,
        conn: &mut PgConnection,
        data: &CreateEmployee,
    ) -> AppResult<Employee> {
        sqlx::query_as::<_, Employee>(
            "INSERT INTO employees (user_id, first_name, last_name) \
             VALUES ($1, $2, $3) \
             RETURNING *",
        )
        .bind(data.user_id)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .fetch_one(conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("employees_pkey") => {
                AppError::conflict(format!("Employee already exists for user {}", data.user_id))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create employee", e),
        })
    }

    /// Fetch an employee row with a `FOR UPDATE` lock, serializing
    /// concurrent hierarchy mutations touching the same subtrees.
    pub async fn lock_for_update(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> AppResult<Employee> {
        sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE user_id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock employee", e))?
            .ok_or_else(|| AppError::not_found(format!("Employee '{user_id}' not found")))
    }

    /// Set or clear the supervisor pointer inside an open transaction.
    pub async fn set_supervisor(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        supervisor_id: Option<Uuid>,
    ) -> AppResult<()> {
        let result = sqlx::query("UPDATE employees SET supervisor_id = $2 WHERE user_id = $1")
            .bind(user_id)
            .bind(supervisor_id)
            .execute(conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update supervisor", e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Employee '{user_id}' not found"
            )));
        }
        Ok(())
    }

    /// Delete an employee row inside an open transaction.
    pub async fn delete(&self, conn: &mut PgConnection, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE user_id = $1")
            .bind(user_id)
            .execute(conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete employee", e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
