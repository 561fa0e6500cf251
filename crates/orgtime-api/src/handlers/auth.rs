//! Auth handlers — register, login, refresh, logout, password change, me.

use axum::Json;
use axum::extract::State;

use orgtime_core::error::AppError;

use crate::dto::request::{ChangePasswordRequest, LoginRequest, RefreshRequest, RegisterRequest};
use crate::dto::response::{
    AccessTokenResponse, ApiResponse, AuthResponse, MessageResponse, UserResponse,
};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let result = state
        .session_manager
        .register(&req.username, &req.password)
        .await?;

    Ok(Json(ApiResponse::ok(AuthResponse {
        user: UserResponse::from(result.user),
        tokens: result.tokens.into(),
    })))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let result = state
        .session_manager
        .login(&req.username, &req.password)
        .await?;

    Ok(Json(ApiResponse::ok(AuthResponse {
        user: UserResponse::from(result.user),
        tokens: result.tokens.into(),
    })))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<AccessTokenResponse>>, AppError> {
    let (access_token, expires_at) = state.session_manager.refresh(&req.refresh_token).await?;

    Ok(Json(ApiResponse::ok(AccessTokenResponse {
        access_token,
        expires_at,
    })))
}

/// POST /api/auth/logout
///
/// Rotates the session key, so every outstanding access and refresh
/// token for the user stops working, not just the one presented.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state.session_manager.logout_all(auth.id).await?;

    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Logged out from all sessions",
    ))))
}

/// PUT /api/auth/password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state
        .session_manager
        .change_password(auth.user(), &req.current_password, &req.new_password)
        .await?;

    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Password changed; please log in again",
    ))))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let employee = state.employee_repo.find_by_user_id(auth.id).await?;

    Ok(Json(ApiResponse::ok(UserResponse::from_pair((
        auth.0, employee,
    )))))
}
