//! Equipment API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        equipment::{
            CreateEquipment, Equipment, EquipmentSearchQuery, EquipmentShort,
            MaintenanceHistoryEntry, QrCodeResponse, UpdateEquipment,
        },
        page::PageQuery,
    },
};

use super::{AuthenticatedUser, PaginatedResponse};

/// List equipment
#[utoipa::path(
    get,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Equipment list", body = PaginatedResponse<EquipmentShort>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<EquipmentShort>>> {
    let (items, total) = state.services.equipment.list(&page).await?;
    Ok(Json(PaginatedResponse::new(items, total, &page)))
}

/// Get equipment by ID
#[utoipa::path(
    get,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment details", body = Equipment),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn get_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Equipment>> {
    let equipment = state.services.equipment.get_by_id(id).await?;
    Ok(Json(equipment))
}

/// Register equipment
#[utoipa::path(
    post,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body = CreateEquipment,
    responses(
        (status = 201, description = "Equipment created", body = Equipment),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Department not found"),
        (status = 409, description = "Code or serial number already registered")
    )
)]
pub async fn create_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateEquipment>,
) -> AppResult<(StatusCode, Json<Equipment>)> {
    claims.require_write()?;
    let equipment = state.services.equipment.create(&data).await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

/// Update equipment
#[utoipa::path(
    put,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Equipment ID")),
    request_body = UpdateEquipment,
    responses(
        (status = 200, description = "Equipment updated", body = Equipment),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn update_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateEquipment>,
) -> AppResult<Json<Equipment>> {
    claims.require_write()?;
    let equipment = state.services.equipment.update(id, &data).await?;
    Ok(Json(equipment))
}

/// Delete equipment
#[utoipa::path(
    delete,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Equipment ID")),
    responses(
        (status = 204, description = "Equipment deleted"),
        (status = 404, description = "Equipment not found"),
        (status = 409, description = "Equipment has maintenance records or service orders")
    )
)]
pub async fn delete_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_write()?;
    state.services.equipment.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Maintenance history of one piece of equipment
#[utoipa::path(
    get,
    path = "/equipment/{id}/history",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Maintenance history, newest first", body = Vec<MaintenanceHistoryEntry>),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn get_history(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<MaintenanceHistoryEntry>>> {
    let history = state.services.equipment.history(id).await?;
    Ok(Json(history))
}

/// Generate and store the QR code URL
#[utoipa::path(
    post,
    path = "/equipment/{id}/qr-code",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "QR code URL", body = QrCodeResponse),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn generate_qr_code(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<QrCodeResponse>> {
    claims.require_write()?;
    let qr = state.services.equipment.generate_qr_code(id).await?;
    Ok(Json(qr))
}

/// Equipment of one department
#[utoipa::path(
    get,
    path = "/equipment/department/{department_id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("department_id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Equipment list", body = Vec<EquipmentShort>),
        (status = 404, description = "Department not found")
    )
)]
pub async fn by_department(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(department_id): Path<Uuid>,
) -> AppResult<Json<Vec<EquipmentShort>>> {
    let equipment = state.services.equipment.by_department(department_id).await?;
    Ok(Json(equipment))
}

/// Equipment in a given status
#[utoipa::path(
    get,
    path = "/equipment/status/{status}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("status" = String, Path, description = "Equipment status, case-insensitive")),
    responses(
        (status = 200, description = "Equipment list", body = Vec<EquipmentShort>),
        (status = 400, description = "Unknown status")
    )
)]
pub async fn by_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(status): Path<String>,
) -> AppResult<Json<Vec<EquipmentShort>>> {
    let equipment = state.services.equipment.by_status(&status).await?;
    Ok(Json(equipment))
}

/// Search equipment by code, name, model, manufacturer or serial number
#[utoipa::path(
    get,
    path = "/equipment/search",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(EquipmentSearchQuery),
    responses(
        (status = 200, description = "Matching equipment", body = Vec<EquipmentShort>),
        (status = 400, description = "Empty search term")
    )
)]
pub async fn search_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<EquipmentSearchQuery>,
) -> AppResult<Json<Vec<EquipmentShort>>> {
    let equipment = state.services.equipment.search(query.term.as_deref()).await?;
    Ok(Json(equipment))
}
