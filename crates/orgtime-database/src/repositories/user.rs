//! User repository implementation.

use sqlx::postgres::PgConnection;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use orgtime_core::error::{AppError, ErrorKind};
use orgtime_core::result::AppResult;
use orgtime_core::types::pagination::{PageRequest, PageResponse};
use orgtime_entity::employee::Employee;
use orgtime_entity::user::{CreateUser, User};

/// A user joined with its optional employee record.
pub type UserEmployeePair = (User, Option<Employee>);

/// Flat row for the `users LEFT JOIN employees` queries.
#[derive(Debug, FromRow)]
struct UserEmployeeRow {
    id: Uuid,
    username: String,
    password_hash: String,
    session_key: Uuid,
    is_superuser: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    first_name: Option<String>,
    last_name: Option<String>,
    supervisor_id: Option<Uuid>,
}

impl UserEmployeeRow {
    fn into_pair(self) -> UserEmployeePair {
        let user = User {
            id: self.id,
            username: self.username,
            password_hash: self.password_hash,
            session_key: self.session_key,
            is_superuser: self.is_superuser,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        let employee = match (self.first_name, self.last_name) {
            (Some(first_name), Some(last_name)) => Some(Employee {
                user_id: user.id,
                first_name,
                last_name,
                supervisor_id: self.supervisor_id,
            }),
            _ => None,
        };
        (user, employee)
    }
}

/// Columns selected by every pair query.
const PAIR_COLUMNS: &str = "u.id, u.username, u.password_hash, u.session_key, u.is_superuser, \
     u.created_at, u.updated_at, e.first_name, e.last_name, e.supervisor_id";

/// Repository for user identity records.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    /// Find a user by username.
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by username", e)
            })
    }

    /// Create a new user.
    pub async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password_hash, is_superuser) \
             VALUES ($1, $2, $3) \
             RETURNING *",
        )
        .bind(&data.username)
        .bind(&data.password_hash)
        .bind(data.is_superuser)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("users_username_key") =>
            {
                AppError::conflict(format!("User '{}' already exists", data.username))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create user", e),
        })
    }

    /// Rotate the user's session key to a fresh random value, invalidating
    /// every previously issued token. Returns the new key.
    pub async fn rotate_session_key(&self, user_id: Uuid) -> AppResult<Uuid> {
        sqlx::query_scalar::<_, Uuid>(
            "UPDATE users SET session_key = gen_random_uuid(), updated_at = NOW() \
             WHERE id = $1 RETURNING session_key",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rotate session key", e))?
        .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))
    }

    /// Store a new password hash and rotate the session key in one
    /// statement, so old tokens can never outlive a password change.
    pub async fn update_password_and_rotate_key(
        &self,
        user_id: Uuid,
        password_hash: &str,
    ) -> AppResult<Uuid> {
        sqlx::query_scalar::<_, Uuid>(
            "UPDATE users SET password_hash = $2, session_key = gen_random_uuid(), \
                              updated_at = NOW() \
             WHERE id = $1 RETURNING session_key",
        )
        .bind(user_id)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update password", e))?
        .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))
    }

    /// Delete a user inside an open transaction. The employees and
    /// hierarchy rows cascade at the schema level; the caller is expected
    /// to have detached the employee from the hierarchy first.
    pub async fn delete(&self, conn: &mut PgConnection, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete user", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// List all users with their optional employee records, paginated.
    pub async fn list_with_employees(
        &self,
        page: &PageRequest,
    ) -> AppResult<PageResponse<UserEmployeePair>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count users", e))?;

        let rows = sqlx::query_as::<_, UserEmployeeRow>(&format!(
            "SELECT {PAIR_COLUMNS} FROM users u \
             LEFT JOIN employees e ON e.user_id = u.id \
             ORDER BY u.created_at ASC LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list users", e))?;

        Ok(PageResponse::new(
            rows.into_iter().map(UserEmployeeRow::into_pair).collect(),
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List the users whose employees sit at or below `ancestor_id` in the
    /// hierarchy, paginated. `include_self` controls whether the ancestor's
    /// own record is part of the result.
    pub async fn list_subordinates_with_users(
        &self,
        ancestor_id: Uuid,
        include_self: bool,
        page: &PageRequest,
    ) -> AppResult<PageResponse<UserEmployeePair>> {
        let min_depth: i32 = if include_self { 0 } else { 1 };

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM employee_hierarchy h \
             WHERE h.ancestor_id = $1 AND h.depth >= $2",
        )
        .bind(ancestor_id)
        .bind(min_depth)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count subordinates", e)
        })?;

        let rows = sqlx::query_as::<_, UserEmployeeRow>(&format!(
            "SELECT {PAIR_COLUMNS} FROM users u \
             JOIN employees e ON e.user_id = u.id \
             JOIN employee_hierarchy h ON h.descendant_id = e.user_id \
             WHERE h.ancestor_id = $1 AND h.depth >= $2 \
             ORDER BY h.depth ASC, u.username ASC LIMIT $3 OFFSET $4"
        ))
        .bind(ancestor_id)
        .bind(min_depth)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list subordinates", e)
        })?;

        Ok(PageResponse::new(
            rows.into_iter().map(UserEmployeeRow::into_pair).collect(),
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Count total users.
    pub async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count users", e))?;
        Ok(count as u64)
    }
}
