//! Maintenance record endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        maintenance::{
            CreateMaintenance, MaintenanceDetails, MaintenanceRecord, MaintenanceShort,
            PeriodQuery, UpdateMaintenance,
        },
        page::PageQuery,
    },
};

use super::{AuthenticatedUser, PaginatedResponse, StatusResponse, StatusUpdateRequest};

/// List maintenance records
#[utoipa::path(
    get,
    path = "/maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Maintenance records", body = PaginatedResponse<MaintenanceShort>)
    )
)]
pub async fn list_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<MaintenanceShort>>> {
    let (items, total) = state.services.maintenance.list(&page).await?;
    Ok(Json(PaginatedResponse::new(items, total, &page)))
}

/// Get maintenance record details
#[utoipa::path(
    get,
    path = "/maintenance/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Maintenance record ID")),
    responses(
        (status = 200, description = "Maintenance record", body = MaintenanceDetails),
        (status = 404, description = "Maintenance record not found")
    )
)]
pub async fn get_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MaintenanceDetails>> {
    let details = state.services.maintenance.get_details(id).await?;
    Ok(Json(details))
}

/// Create a maintenance record
#[utoipa::path(
    post,
    path = "/maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    request_body = CreateMaintenance,
    responses(
        (status = 201, description = "Maintenance record created", body = MaintenanceRecord),
        (status = 400, description = "Invalid input or status"),
        (status = 404, description = "Equipment or technician not found")
    )
)]
pub async fn create_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateMaintenance>,
) -> AppResult<(StatusCode, Json<MaintenanceRecord>)> {
    claims.require_write()?;
    let record = state.services.maintenance.create(data).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Update a maintenance record
#[utoipa::path(
    put,
    path = "/maintenance/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Maintenance record ID")),
    request_body = UpdateMaintenance,
    responses(
        (status = 200, description = "Maintenance record updated", body = MaintenanceRecord),
        (status = 400, description = "Invalid input or status"),
        (status = 404, description = "Maintenance record not found")
    )
)]
pub async fn update_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateMaintenance>,
) -> AppResult<Json<MaintenanceRecord>> {
    claims.require_write()?;
    let record = state.services.maintenance.update(id, data).await?;
    Ok(Json(record))
}

/// Change the status of a maintenance record
#[utoipa::path(
    put,
    path = "/maintenance/{id}/status",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Maintenance record ID")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Status updated", body = StatusResponse),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Maintenance record not found")
    )
)]
pub async fn update_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusUpdateRequest>,
) -> AppResult<Json<StatusResponse>> {
    claims.require_write()?;
    let record = state
        .services
        .maintenance
        .update_status(id, &request.status)
        .await?;
    Ok(Json(StatusResponse {
        id: record.id,
        status: record.status.to_string(),
        message: "Maintenance status updated".to_string(),
    }))
}

/// Delete a maintenance record
#[utoipa::path(
    delete,
    path = "/maintenance/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Maintenance record ID")),
    responses(
        (status = 204, description = "Maintenance record deleted"),
        (status = 404, description = "Maintenance record not found"),
        (status = 409, description = "Record referenced by a service order")
    )
)]
pub async fn delete_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_write()?;
    state.services.maintenance.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Maintenance records of one piece of equipment
#[utoipa::path(
    get,
    path = "/maintenance/equipment/{equipment_id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("equipment_id" = Uuid, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Maintenance records", body = Vec<MaintenanceShort>),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn by_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(equipment_id): Path<Uuid>,
) -> AppResult<Json<Vec<MaintenanceShort>>> {
    let records = state.services.maintenance.by_equipment(equipment_id).await?;
    Ok(Json(records))
}

/// Maintenance records assigned to a technician (internal or external)
#[utoipa::path(
    get,
    path = "/maintenance/technician/{technician_id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("technician_id" = Uuid, Path, description = "Technician ID")),
    responses(
        (status = 200, description = "Maintenance records", body = Vec<MaintenanceShort>)
    )
)]
pub async fn by_technician(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(technician_id): Path<Uuid>,
) -> AppResult<Json<Vec<MaintenanceShort>>> {
    let records = state.services.maintenance.by_technician(technician_id).await?;
    Ok(Json(records))
}

/// Maintenance records scheduled in a period
#[utoipa::path(
    get,
    path = "/maintenance/period",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(PeriodQuery),
    responses(
        (status = 200, description = "Maintenance records", body = Vec<MaintenanceShort>),
        (status = 400, description = "Missing or inverted period")
    )
)]
pub async fn by_period(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<PeriodQuery>,
) -> AppResult<Json<Vec<MaintenanceShort>>> {
    let records = state.services.maintenance.by_period(&query).await?;
    Ok(Json(records))
}
