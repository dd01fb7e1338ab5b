//! Technician endpoints: internal staff, external companies and their technicians

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::technician::{
        CreateExternalCompany, CreateExternalTechnician, CreateTechnician, ExternalCompany,
        ExternalTechnician, Technician, UpdateExternalCompany, UpdateExternalTechnician,
        UpdateTechnician,
    },
};

use super::AuthenticatedUser;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TechnicianQuery {
    /// Only technicians flagged as available
    #[serde(default)]
    pub available: bool,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ExternalTechnicianQuery {
    /// Restrict to one company
    pub company_id: Option<Uuid>,
}

/// List internal technicians
#[utoipa::path(
    get,
    path = "/technicians",
    tag = "technicians",
    security(("bearer_auth" = [])),
    params(TechnicianQuery),
    responses((status = 200, description = "Technicians", body = Vec<Technician>))
)]
pub async fn list_technicians(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<TechnicianQuery>,
) -> AppResult<Json<Vec<Technician>>> {
    Ok(Json(state.services.technicians.list(query.available).await?))
}

#[utoipa::path(
    get,
    path = "/technicians/{id}",
    tag = "technicians",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Technician ID")),
    responses(
        (status = 200, description = "Technician", body = Technician),
        (status = 404, description = "Technician not found")
    )
)]
pub async fn get_technician(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Technician>> {
    Ok(Json(state.services.technicians.get_by_id(id).await?))
}

#[utoipa::path(
    post,
    path = "/technicians",
    tag = "technicians",
    security(("bearer_auth" = [])),
    request_body = CreateTechnician,
    responses(
        (status = 201, description = "Technician created", body = Technician),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_technician(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateTechnician>,
) -> AppResult<(StatusCode, Json<Technician>)> {
    claims.require_write()?;
    let technician = state.services.technicians.create(&data).await?;
    Ok((StatusCode::CREATED, Json(technician)))
}

#[utoipa::path(
    put,
    path = "/technicians/{id}",
    tag = "technicians",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Technician ID")),
    request_body = UpdateTechnician,
    responses(
        (status = 200, description = "Technician updated", body = Technician),
        (status = 404, description = "Technician not found")
    )
)]
pub async fn update_technician(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateTechnician>,
) -> AppResult<Json<Technician>> {
    claims.require_write()?;
    Ok(Json(state.services.technicians.update(id, &data).await?))
}

#[utoipa::path(
    delete,
    path = "/technicians/{id}",
    tag = "technicians",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Technician ID")),
    responses(
        (status = 204, description = "Technician deleted"),
        (status = 409, description = "Technician has maintenance records")
    )
)]
pub async fn delete_technician(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_write()?;
    state.services.technicians.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List external service companies
#[utoipa::path(
    get,
    path = "/external-companies",
    tag = "technicians",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "External companies", body = Vec<ExternalCompany>))
)]
pub async fn list_companies(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<ExternalCompany>>> {
    Ok(Json(state.services.technicians.list_companies().await?))
}

#[utoipa::path(
    get,
    path = "/external-companies/{id}",
    tag = "technicians",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Company ID")),
    responses(
        (status = 200, description = "External company", body = ExternalCompany),
        (status = 404, description = "Company not found")
    )
)]
pub async fn get_company(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ExternalCompany>> {
    Ok(Json(state.services.technicians.get_company(id).await?))
}

#[utoipa::path(
    post,
    path = "/external-companies",
    tag = "technicians",
    security(("bearer_auth" = [])),
    request_body = CreateExternalCompany,
    responses(
        (status = 201, description = "Company created", body = ExternalCompany),
        (status = 409, description = "Tax id already registered")
    )
)]
pub async fn create_company(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateExternalCompany>,
) -> AppResult<(StatusCode, Json<ExternalCompany>)> {
    claims.require_write()?;
    let company = state.services.technicians.create_company(&data).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

#[utoipa::path(
    put,
    path = "/external-companies/{id}",
    tag = "technicians",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Company ID")),
    request_body = UpdateExternalCompany,
    responses(
        (status = 200, description = "Company updated", body = ExternalCompany),
        (status = 404, description = "Company not found")
    )
)]
pub async fn update_company(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateExternalCompany>,
) -> AppResult<Json<ExternalCompany>> {
    claims.require_write()?;
    Ok(Json(state.services.technicians.update_company(id, &data).await?))
}

#[utoipa::path(
    delete,
    path = "/external-companies/{id}",
    tag = "technicians",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Company ID")),
    responses(
        (status = 204, description = "Company deleted"),
        (status = 409, description = "Company still has technicians or maintenance records")
    )
)]
pub async fn delete_company(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_write()?;
    state.services.technicians.delete_company(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List external technicians
#[utoipa::path(
    get,
    path = "/external-technicians",
    tag = "technicians",
    security(("bearer_auth" = [])),
    params(ExternalTechnicianQuery),
    responses((status = 200, description = "External technicians", body = Vec<ExternalTechnician>))
)]
pub async fn list_external(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<ExternalTechnicianQuery>,
) -> AppResult<Json<Vec<ExternalTechnician>>> {
    Ok(Json(state.services.technicians.list_external(query.company_id).await?))
}

#[utoipa::path(
    get,
    path = "/external-technicians/{id}",
    tag = "technicians",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "External technician ID")),
    responses(
        (status = 200, description = "External technician", body = ExternalTechnician),
        (status = 404, description = "External technician not found")
    )
)]
pub async fn get_external(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ExternalTechnician>> {
    Ok(Json(state.services.technicians.get_external(id).await?))
}

#[utoipa::path(
    post,
    path = "/external-technicians",
    tag = "technicians",
    security(("bearer_auth" = [])),
    request_body = CreateExternalTechnician,
    responses(
        (status = 201, description = "External technician created", body = ExternalTechnician),
        (status = 404, description = "Company not found")
    )
)]
pub async fn create_external(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateExternalTechnician>,
) -> AppResult<(StatusCode, Json<ExternalTechnician>)> {
    claims.require_write()?;
    let technician = state.services.technicians.create_external(&data).await?;
    Ok((StatusCode::CREATED, Json(technician)))
}

#[utoipa::path(
    put,
    path = "/external-technicians/{id}",
    tag = "technicians",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "External technician ID")),
    request_body = UpdateExternalTechnician,
    responses(
        (status = 200, description = "External technician updated", body = ExternalTechnician),
        (status = 404, description = "External technician or company not found")
    )
)]
pub async fn update_external(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateExternalTechnician>,
) -> AppResult<Json<ExternalTechnician>> {
    claims.require_write()?;
    Ok(Json(state.services.technicians.update_external(id, &data).await?))
}

#[utoipa::path(
    delete,
    path = "/external-technicians/{id}",
    tag = "technicians",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "External technician ID")),
    responses(
        (status = 204, description = "External technician deleted"),
        (status = 409, description = "Technician has maintenance records")
    )
)]
pub async fn delete_external(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_write()?;
    state.services.technicians.delete_external(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
