//! Service order endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        page::PageQuery,
        service_order::{
            CreateServiceOrder, RatingRequest, ServiceOrder, ServiceOrderDetails,
            ServiceOrderShort, UpdateServiceOrder,
        },
    },
};

use super::{AuthenticatedUser, PaginatedResponse, StatusResponse, StatusUpdateRequest};

/// List service orders
#[utoipa::path(
    get,
    path = "/service-orders",
    tag = "service-orders",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Service orders", body = PaginatedResponse<ServiceOrderShort>)
    )
)]
pub async fn list_orders(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<ServiceOrderShort>>> {
    let (items, total) = state.services.service_orders.list(&page).await?;
    Ok(Json(PaginatedResponse::new(items, total, &page)))
}

/// Get service order details
#[utoipa::path(
    get,
    path = "/service-orders/{id}",
    tag = "service-orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Service order ID")),
    responses(
        (status = 200, description = "Service order", body = ServiceOrderDetails),
        (status = 404, description = "Service order not found")
    )
)]
pub async fn get_order(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ServiceOrderDetails>> {
    let order = state.services.service_orders.get_details(id).await?;
    Ok(Json(order))
}

/// Open a service order
#[utoipa::path(
    post,
    path = "/service-orders",
    tag = "service-orders",
    security(("bearer_auth" = [])),
    request_body = CreateServiceOrder,
    responses(
        (status = 201, description = "Service order opened", body = ServiceOrder),
        (status = 400, description = "Invalid input or status"),
        (status = 404, description = "Equipment, department or requester not found")
    )
)]
pub async fn create_order(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateServiceOrder>,
) -> AppResult<(StatusCode, Json<ServiceOrder>)> {
    claims.require_write()?;
    let order = state.services.service_orders.create(data).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Update a service order
#[utoipa::path(
    put,
    path = "/service-orders/{id}",
    tag = "service-orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Service order ID")),
    request_body = UpdateServiceOrder,
    responses(
        (status = 200, description = "Service order updated", body = ServiceOrder),
        (status = 400, description = "Invalid input, status or rating"),
        (status = 404, description = "Service order not found")
    )
)]
pub async fn update_order(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateServiceOrder>,
) -> AppResult<Json<ServiceOrder>> {
    claims.require_write()?;
    let order = state.services.service_orders.update(id, data).await?;
    Ok(Json(order))
}

/// Change the status of a service order
#[utoipa::path(
    put,
    path = "/service-orders/{id}/status",
    tag = "service-orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Service order ID")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Status updated", body = StatusResponse),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Service order not found")
    )
)]
pub async fn update_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusUpdateRequest>,
) -> AppResult<Json<StatusResponse>> {
    claims.require_write()?;
    let order = state
        .services
        .service_orders
        .update_status(id, &request.status)
        .await?;
    Ok(Json(StatusResponse {
        id: order.id,
        status: order.status.to_string(),
        message: "Service order status updated".to_string(),
    }))
}

/// Rate a completed service order
#[utoipa::path(
    post,
    path = "/service-orders/{id}/rating",
    tag = "service-orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Service order ID")),
    request_body = RatingRequest,
    responses(
        (status = 200, description = "Rating recorded", body = ServiceOrder),
        (status = 400, description = "Order not completed or rating outside 1..=5"),
        (status = 404, description = "Service order not found")
    )
)]
pub async fn rate_order(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<RatingRequest>,
) -> AppResult<Json<ServiceOrder>> {
    claims.require_write()?;
    let order = state.services.service_orders.rate(id, request).await?;
    Ok(Json(order))
}

/// Delete a service order
#[utoipa::path(
    delete,
    path = "/service-orders/{id}",
    tag = "service-orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Service order ID")),
    responses(
        (status = 204, description = "Service order deleted"),
        (status = 404, description = "Service order not found")
    )
)]
pub async fn delete_order(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_write()?;
    state.services.service_orders.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Service orders opened by a user
#[utoipa::path(
    get,
    path = "/service-orders/requester/{requester_id}",
    tag = "service-orders",
    security(("bearer_auth" = [])),
    params(("requester_id" = Uuid, Path, description = "Requesting user ID")),
    responses(
        (status = 200, description = "Service orders", body = Vec<ServiceOrderShort>)
    )
)]
pub async fn by_requester(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(requester_id): Path<Uuid>,
) -> AppResult<Json<Vec<ServiceOrderShort>>> {
    let orders = state.services.service_orders.by_requester(requester_id).await?;
    Ok(Json(orders))
}

/// Service orders of a department
#[utoipa::path(
    get,
    path = "/service-orders/department/{department_id}",
    tag = "service-orders",
    security(("bearer_auth" = [])),
    params(("department_id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Service orders", body = Vec<ServiceOrderShort>)
    )
)]
pub async fn by_department(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(department_id): Path<Uuid>,
) -> AppResult<Json<Vec<ServiceOrderShort>>> {
    let orders = state.services.service_orders.by_department(department_id).await?;
    Ok(Json(orders))
}

/// Service orders against one piece of equipment
#[utoipa::path(
    get,
    path = "/service-orders/equipment/{equipment_id}",
    tag = "service-orders",
    security(("bearer_auth" = [])),
    params(("equipment_id" = Uuid, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Service orders", body = Vec<ServiceOrderShort>)
    )
)]
pub async fn by_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(equipment_id): Path<Uuid>,
) -> AppResult<Json<Vec<ServiceOrderShort>>> {
    let orders = state.services.service_orders.by_equipment(equipment_id).await?;
    Ok(Json(orders))
}

/// Service orders in a given status
#[utoipa::path(
    get,
    path = "/service-orders/status/{status}",
    tag = "service-orders",
    security(("bearer_auth" = [])),
    params(("status" = String, Path, description = "Service order status, case-insensitive")),
    responses(
        (status = 200, description = "Service orders", body = Vec<ServiceOrderShort>),
        (status = 400, description = "Unknown status")
    )
)]
pub async fn by_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(status): Path<String>,
) -> AppResult<Json<Vec<ServiceOrderShort>>> {
    let orders = state.services.service_orders.by_status(&status).await?;
    Ok(Json(orders))
}
