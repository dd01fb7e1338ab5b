//! Supplier endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::supplier::{CreateSupplier, Supplier, UpdateSupplier},
};

use super::AuthenticatedUser;

#[utoipa::path(
    get,
    path = "/suppliers",
    tag = "suppliers",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Suppliers", body = Vec<Supplier>))
)]
pub async fn list_suppliers(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Supplier>>> {
    Ok(Json(state.services.suppliers.list().await?))
}

#[utoipa::path(
    get,
    path = "/suppliers/{id}",
    tag = "suppliers",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Supplier ID")),
    responses(
        (status = 200, description = "Supplier", body = Supplier),
        (status = 404, description = "Supplier not found")
    )
)]
pub async fn get_supplier(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Supplier>> {
    Ok(Json(state.services.suppliers.get_by_id(id).await?))
}

#[utoipa::path(
    post,
    path = "/suppliers",
    tag = "suppliers",
    security(("bearer_auth" = [])),
    request_body = CreateSupplier,
    responses(
        (status = 201, description = "Supplier created", body = Supplier),
        (status = 409, description = "Tax id already registered")
    )
)]
pub async fn create_supplier(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateSupplier>,
) -> AppResult<(StatusCode, Json<Supplier>)> {
    claims.require_write()?;
    let supplier = state.services.suppliers.create(&data).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

#[utoipa::path(
    put,
    path = "/suppliers/{id}",
    tag = "suppliers",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Supplier ID")),
    request_body = UpdateSupplier,
    responses(
        (status = 200, description = "Supplier updated", body = Supplier),
        (status = 404, description = "Supplier not found")
    )
)]
pub async fn update_supplier(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateSupplier>,
) -> AppResult<Json<Supplier>> {
    claims.require_write()?;
    Ok(Json(state.services.suppliers.update(id, &data).await?))
}

#[utoipa::path(
    delete,
    path = "/suppliers/{id}",
    tag = "suppliers",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Supplier ID")),
    responses((status = 204, description = "Supplier deleted"))
)]
pub async fn delete_supplier(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_write()?;
    state.services.suppliers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
