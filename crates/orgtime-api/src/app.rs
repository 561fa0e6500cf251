//! Application builder — wires repositories, services, and the router
//! into a runnable Axum app.

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;

use orgtime_auth::jwt::{TokenIssuer, TokenVerifier};
use orgtime_auth::password::{CredentialPolicy, PasswordHasher};
use orgtime_auth::policy::AccessPolicy;
use orgtime_auth::session::SessionManager;
use orgtime_core::config::AppConfig;
use orgtime_core::error::AppError;
use orgtime_database::repositories::employee::EmployeeRepository;
use orgtime_database::repositories::hierarchy::HierarchyRepository;
use orgtime_database::repositories::user::UserRepository;
use orgtime_service::employee::EmployeeService;
use orgtime_service::user::UserService;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the shared application state from configuration and an open
/// database pool.
pub fn build_state(config: AppConfig, db_pool: PgPool) -> Result<AppState, AppError> {
    let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
    let employee_repo = Arc::new(EmployeeRepository::new(db_pool.clone()));
    let hierarchy_repo = Arc::new(HierarchyRepository::new(db_pool.clone()));

    let issuer = Arc::new(TokenIssuer::new(&config.auth)?);
    let verifier = Arc::new(TokenVerifier::new(&config.auth)?);
    let hasher = Arc::new(PasswordHasher::new());
    let policy = CredentialPolicy::new(&config.auth);

    let session_manager = Arc::new(SessionManager::new(
        Arc::clone(&user_repo),
        issuer,
        verifier,
        hasher,
        policy,
    ));

    let access_policy = Arc::new(AccessPolicy::new(
        Arc::clone(&employee_repo),
        Arc::clone(&hierarchy_repo),
        config.auth.max_hierarchy_depth,
    ));

    let employee_service = Arc::new(EmployeeService::new(
        db_pool.clone(),
        Arc::clone(&user_repo),
        Arc::clone(&employee_repo),
        Arc::clone(&hierarchy_repo),
        config.auth.max_hierarchy_depth,
    ));

    let user_service = Arc::new(UserService::new(
        db_pool.clone(),
        Arc::clone(&user_repo),
        Arc::clone(&employee_repo),
        Arc::clone(&employee_service),
        Arc::clone(&access_policy),
    ));

    Ok(AppState {
        config: Arc::new(config),
        db_pool,
        session_manager,
        access_policy,
        user_repo,
        employee_repo,
        hierarchy_repo,
        user_service,
        employee_service,
    })
}

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}
