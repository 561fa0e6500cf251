//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use orgtime_auth::policy::AccessPolicy;
use orgtime_auth::session::SessionManager;
use orgtime_core::config::AppConfig;
use orgtime_database::repositories::employee::EmployeeRepository;
use orgtime_database::repositories::hierarchy::HierarchyRepository;
use orgtime_database::repositories::user::UserRepository;
use orgtime_service::employee::EmployeeService;
use orgtime_service::user::UserService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool
    pub db_pool: PgPool,

    /// Session lifecycle manager
    pub session_manager: Arc<SessionManager>,
    /// Hierarchy-derived read/write policy
    pub access_policy: Arc<AccessPolicy>,

    /// User repository
    pub user_repo: Arc<UserRepository>,
    /// Employee repository
    pub employee_repo: Arc<EmployeeRepository>,
    /// Closure-table repository
    pub hierarchy_repo: Arc<HierarchyRepository>,

    /// User queries and account management
    pub user_service: Arc<UserService>,
    /// Employee lifecycle and hierarchy mutations
    pub employee_service: Arc<EmployeeService>,
}
