//! Certificate endpoints

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
    models::certificate::{CertificateView, CreateCertificate, ExpiringQuery, UpdateCertificate},
};

use super::AuthenticatedUser;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CertificateQuery {
    /// Restrict to one piece of equipment
    pub equipment_id: Option<Uuid>,
}

/// List certificates
#[utoipa::path(
    get,
    path = "/certificates",
    tag = "certificates",
    security(("bearer_auth" = [])),
    params(CertificateQuery),
    responses((status = 200, description = "Certificates", body = Vec<CertificateView>))
)]
pub async fn list_certificates(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<CertificateQuery>,
) -> AppResult<Json<Vec<CertificateView>>> {
    Ok(Json(state.services.certificates.list(query.equipment_id).await?))
}

/// Certificates expiring within a window of days
#[utoipa::path(
    get,
    path = "/certificates/expiring",
    tag = "certificates",
    security(("bearer_auth" = [])),
    params(ExpiringQuery),
    responses(
        (status = 200, description = "Certificates about to expire", body = Vec<CertificateView>),
        (status = 400, description = "Invalid window")
    )
)]
pub async fn expiring_certificates(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<ExpiringQuery>,
) -> AppResult<Json<Vec<CertificateView>>> {
    Ok(Json(state.services.certificates.expiring(query.days).await?))
}

#[utoipa::path(
    get,
    path = "/certificates/{id}",
    tag = "certificates",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Certificate ID")),
    responses(
        (status = 200, description = "Certificate", body = CertificateView),
        (status = 404, description = "Certificate not found")
    )
)]
pub async fn get_certificate(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CertificateView>> {
    Ok(Json(state.services.certificates.get_by_id(id).await?))
}

#[utoipa::path(
    post,
    path = "/certificates",
    tag = "certificates",
    security(("bearer_auth" = [])),
    request_body = CreateCertificate,
    responses(
        (status = 201, description = "Certificate created", body = CertificateView),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn create_certificate(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateCertificate>,
) -> AppResult<(StatusCode, Json<CertificateView>)> {
    claims.require_write()?;
    let certificate = state.services.certificates.create(&data).await?;
    Ok((StatusCode::CREATED, Json(certificate)))
}

#[utoipa::path(
    put,
    path = "/certificates/{id}",
    tag = "certificates",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Certificate ID")),
    request_body = UpdateCertificate,
    responses(
        (status = 200, description = "Certificate updated", body = CertificateView),
        (status = 404, description = "Certificate not found")
    )
)]
pub async fn update_certificate(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateCertificate>,
) -> AppResult<Json<CertificateView>> {
    claims.require_write()?;
    Ok(Json(state.services.certificates.update(id, &data).await?))
}

#[utoipa::path(
    delete,
    path = "/certificates/{id}",
    tag = "certificates",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Certificate ID")),
    responses((status = 204, description = "Certificate deleted"))
)]
pub async fn delete_certificate(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_write()?;
    state.services.certificates.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
