//! Supplier model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Parts and equipment supplier
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Supplier {
    pub id: Uuid,
    pub legal_name: String,
    pub tax_id: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub main_contact: Option<String>,
    /// Categories of goods supplied
    pub categories: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSupplier {
    #[validate(length(min = 1, max = 200, message = "Legal name must be 1 to 200 characters"))]
    pub legal_name: String,
    #[validate(length(min = 1, max = 18, message = "Tax id must be 1 to 18 characters"))]
    pub tax_id: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub main_contact: Option<String>,
    pub categories: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSupplier {
    #[validate(length(min = 1, max = 200, message = "Legal name must be 1 to 200 characters"))]
    pub legal_name: Option<String>,
    #[validate(length(min = 1, max = 18, message = "Tax id must be 1 to 18 characters"))]
    pub tax_id: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub main_contact: Option<String>,
    pub categories: Option<serde_json::Value>,
}
