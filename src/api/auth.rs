//! Authentication endpoints

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    error::AppResult,
    models::user::{LoginRequest, LoginResponse, RefreshResponse, User},
};

use super::{AuthenticatedUser, MessageResponse, RefreshUser};

/// Login with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account inactive")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    request.validate()?;
    let response = state
        .services
        .users
        .login(&request.email, &request.password)
        .await?;
    Ok(Json(response))
}

/// Exchange a refresh token (bearer header) for a new access token
#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "New access token", body = RefreshResponse),
        (status = 401, description = "Missing, invalid or non-refresh token")
    )
)]
pub async fn refresh(
    State(state): State<crate::AppState>,
    RefreshUser(claims): RefreshUser,
) -> AppResult<Json<RefreshResponse>> {
    let response = state.services.users.refresh(&claims).await?;
    Ok(Json(response))
}

/// Logout. Tokens are stateless, so clients just drop them.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out", body = MessageResponse)
    )
)]
pub async fn logout(AuthenticatedUser(claims): AuthenticatedUser) -> Json<MessageResponse> {
    tracing::debug!(user_id = %claims.user_id(), "User logged out");
    Json(MessageResponse {
        message: "Logged out".to_string(),
    })
}

/// Get current user info
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<User>> {
    let user = state.services.users.get_by_id(claims.user_id()).await?;
    Ok(Json(user))
}
