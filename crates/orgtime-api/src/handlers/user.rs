//! User handlers — visibility-scoped listing, lookup, and deletion.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use orgtime_core::error::AppError;

use crate::dto::response::{ApiResponse, MessageResponse, PaginatedResponse, UserResponse};
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/users
///
/// Superusers see everyone; employees see their own subtree; users
/// without an employee record see only themselves.
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<UserResponse>>>, AppError> {
    let page = state
        .user_service
        .visible_users(auth.user(), &params.into_page_request())
        .await?;

    Ok(Json(ApiResponse::ok(PaginatedResponse::from_page(
        page,
        UserResponse::from_pair,
    ))))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let pair = state.user_service.get_user(auth.user(), id).await?;

    Ok(Json(ApiResponse::ok(UserResponse::from_pair(pair))))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state.user_service.delete_user(auth.user(), id).await?;

    Ok(Json(ApiResponse::ok(MessageResponse::new("User deleted"))))
}
