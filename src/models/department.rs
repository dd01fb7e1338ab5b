//! Department model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Clinic department or sector
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// User responsible for the department
    pub manager_id: Option<Uuid>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDepartment {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,
    #[validate(length(max = 255, message = "Description must be at most 255 characters"))]
    pub description: Option<String>,
    pub manager_id: Option<Uuid>,
    pub location: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateDepartment {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 255, message = "Description must be at most 255 characters"))]
    pub description: Option<String>,
    pub manager_id: Option<Uuid>,
    pub location: Option<String>,
}
