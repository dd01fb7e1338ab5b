//! Department endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::department::{CreateDepartment, Department, UpdateDepartment},
};

use super::AuthenticatedUser;

/// List departments
#[utoipa::path(
    get,
    path = "/departments",
    tag = "departments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Departments", body = Vec<Department>)
    )
)]
pub async fn list_departments(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Department>>> {
    let departments = state.services.departments.list().await?;
    Ok(Json(departments))
}

/// Get department by ID
#[utoipa::path(
    get,
    path = "/departments/{id}",
    tag = "departments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department", body = Department),
        (status = 404, description = "Department not found")
    )
)]
pub async fn get_department(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Department>> {
    let department = state.services.departments.get_by_id(id).await?;
    Ok(Json(department))
}

/// Create department
#[utoipa::path(
    post,
    path = "/departments",
    tag = "departments",
    security(("bearer_auth" = [])),
    request_body = CreateDepartment,
    responses(
        (status = 201, description = "Department created", body = Department),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_department(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateDepartment>,
) -> AppResult<(StatusCode, Json<Department>)> {
    claims.require_write()?;
    let department = state.services.departments.create(&data).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

/// Update department
#[utoipa::path(
    put,
    path = "/departments/{id}",
    tag = "departments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Department ID")),
    request_body = UpdateDepartment,
    responses(
        (status = 200, description = "Department updated", body = Department),
        (status = 404, description = "Department not found")
    )
)]
pub async fn update_department(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateDepartment>,
) -> AppResult<Json<Department>> {
    claims.require_write()?;
    let department = state.services.departments.update(id, &data).await?;
    Ok(Json(department))
}

/// Delete department
#[utoipa::path(
    delete,
    path = "/departments/{id}",
    tag = "departments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 204, description = "Department deleted"),
        (status = 409, description = "Department still has equipment")
    )
)]
pub async fn delete_department(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_write()?;
    state.services.departments.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
