//! Route definitions for the Orgtime HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(employee_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Auth endpoints: register, login, refresh, logout, password, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/password", put(handlers::auth::change_password))
        .route("/auth/me", get(handlers::auth::me))
}

/// User listing, lookup, and deletion
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::user::list_users))
        .route("/users/{id}", get(handlers::user::get_user))
        .route("/users/{id}", delete(handlers::user::delete_user))
}

/// Employee records and hierarchy
fn employee_routes() -> Router<AppState> {
    Router::new()
        .route("/employees", post(handlers::employee::create_employee))
        .route("/employees/{id}", get(handlers::employee::get_employee))
        .route(
            "/employees/{id}/ancestors",
            get(handlers::employee::get_ancestors),
        )
        .route(
            "/employees/{id}/descendants",
            get(handlers::employee::get_descendants),
        )
        .route(
            "/employees/{id}/supervisor",
            put(handlers::employee::assign_supervisor),
        )
        .route(
            "/employees/{id}/supervisor",
            delete(handlers::employee::remove_supervisor),
        )
}

/// Health check endpoints (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}
