//! Employee handlers — record creation, hierarchy queries, and
//! supervisor-link mutations.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use uuid::Uuid;

use orgtime_core::error::AppError;
use orgtime_entity::employee::CreateEmployee;
use orgtime_entity::user::User;

use crate::dto::request::{AssignSupervisorRequest, CreateEmployeeRequest};
use crate::dto::response::{
    ApiResponse, EmployeeResponse, MessageResponse, RankedEmployeeResponse,
};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// Query parameters for ancestor/descendant listings.
#[derive(Debug, Clone, Deserialize)]
pub struct HierarchyQuery {
    /// Include the queried employee itself (depth 0).
    #[serde(default)]
    pub include_self: bool,
}

fn require_superuser(user: &User) -> Result<(), AppError> {
    if user.is_superuser {
        Ok(())
    } else {
        Err(AppError::not_authorized(
            "Only superusers may modify the hierarchy",
        ))
    }
}

/// POST /api/employees
pub async fn create_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateEmployeeRequest>,
) -> Result<Json<ApiResponse<EmployeeResponse>>, AppError> {
    require_superuser(auth.user())?;

    let employee = state
        .employee_service
        .create_employee(&CreateEmployee {
            user_id: req.user_id,
            first_name: req.first_name,
            last_name: req.last_name,
        })
        .await?;

    Ok(Json(ApiResponse::ok(EmployeeResponse::from(employee))))
}

/// GET /api/employees/{id}
pub async fn get_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<EmployeeResponse>>, AppError> {
    // Read visibility is enforced on the owning user.
    let (_, employee) = state.user_service.get_user(auth.user(), id).await?;

    let employee =
        employee.ok_or_else(|| AppError::not_found(format!("Employee '{id}' not found")))?;

    Ok(Json(ApiResponse::ok(EmployeeResponse::from(employee))))
}

/// GET /api/employees/{id}/ancestors
pub async fn get_ancestors(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<HierarchyQuery>,
) -> Result<Json<ApiResponse<Vec<RankedEmployeeResponse>>>, AppError> {
    state.user_service.get_user(auth.user(), id).await?;

    let ancestors = state
        .employee_service
        .get_ancestors(id, query.include_self)
        .await?;

    Ok(Json(ApiResponse::ok(
        ancestors.into_iter().map(Into::into).collect(),
    )))
}

/// GET /api/employees/{id}/descendants
pub async fn get_descendants(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<HierarchyQuery>,
) -> Result<Json<ApiResponse<Vec<RankedEmployeeResponse>>>, AppError> {
    state.user_service.get_user(auth.user(), id).await?;

    let descendants = state
        .employee_service
        .get_descendants(id, query.include_self)
        .await?;

    Ok(Json(ApiResponse::ok(
        descendants.into_iter().map(Into::into).collect(),
    )))
}

/// PUT /api/employees/{id}/supervisor
pub async fn assign_supervisor(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<AssignSupervisorRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    require_superuser(auth.user())?;

    state
        .employee_service
        .assign_supervisor(id, req.supervisor_id)
        .await?;

    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Supervisor assigned",
    ))))
}

/// DELETE /api/employees/{id}/supervisor
pub async fn remove_supervisor(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    require_superuser(auth.user())?;

    state.employee_service.remove_supervisor(id).await?;

    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Supervisor removed",
    ))))
}
