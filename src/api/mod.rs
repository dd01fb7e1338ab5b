//! API handlers for MedTrack REST endpoints

pub mod auth;
pub mod certificates;
pub mod departments;
pub mod equipment;
pub mod health;
pub mod maintenance;
pub mod openapi;
pub mod service_orders;
pub mod suppliers;
pub mod technicians;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        page::PageQuery,
        user::{TokenKind, UserClaims},
    },
    AppState,
};

/// Decode the bearer token of a request
fn bearer_claims(parts: &Parts, state: &AppState) -> Result<UserClaims, AppError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

    UserClaims::from_token(token, &state.config.auth.jwt_secret)
        .map_err(|e| AppError::Authentication(e.to_string()))
}

/// Extractor for authenticated user from an access token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claims = bearer_claims(parts, state)?;
        if claims.kind != TokenKind::Access {
            return Err(AppError::Authentication("Access token required".to_string()));
        }
        Ok(AuthenticatedUser(claims))
    }
}

/// Extractor accepting only refresh tokens
pub struct RefreshUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for RefreshUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claims = bearer_claims(parts, state)?;
        if claims.kind != TokenKind::Refresh {
            return Err(AppError::Authentication("Refresh token required".to_string()));
        }
        Ok(RefreshUser(claims))
    }
}

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Items of the current page
    pub items: Vec<T>,
    /// Total number of items
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Items per page
    pub per_page: i64,
    /// Number of pages
    pub pages: i64,
}

impl<T> PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(items: Vec<T>, total: i64, query: &PageQuery) -> Self {
        let per_page = query.per_page();
        Self {
            items,
            total,
            page: query.page(),
            per_page,
            pages: (total + per_page - 1) / per_page,
        }
    }
}

/// Body of the status-change endpoints
#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusUpdateRequest {
    /// New status label, e.g. "IN_PROGRESS"
    pub status: String,
}

/// Result of a status change
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub id: Uuid,
    pub status: String,
    pub message: String,
}

/// Plain message body
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::equipment::EquipmentShort;

    #[test]
    fn test_page_count() {
        let page = PageQuery::new(2, 10);
        let resp = PaginatedResponse::<EquipmentShort>::new(Vec::new(), 21, &page);
        assert_eq!(resp.pages, 3);
        assert_eq!(resp.page, 2);

        let resp = PaginatedResponse::<EquipmentShort>::new(Vec::new(), 0, &page);
        assert_eq!(resp.pages, 0);
    }
}
