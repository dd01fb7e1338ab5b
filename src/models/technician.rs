//! Technician models: internal staff, external companies and their technicians

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Internal technician
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Technician {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub specialties: Option<serde_json::Value>,
    pub certifications: Option<serde_json::Value>,
    pub available: bool,
    /// Linked login account, if any
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTechnician {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub phone: Option<String>,
    pub specialties: Option<serde_json::Value>,
    pub certifications: Option<serde_json::Value>,
    pub available: Option<bool>,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTechnician {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specialties: Option<serde_json::Value>,
    pub certifications: Option<serde_json::Value>,
    pub available: Option<bool>,
    pub user_id: Option<Uuid>,
}

/// Outsourced maintenance company
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ExternalCompany {
    pub id: Uuid,
    pub legal_name: String,
    /// Company registration number (unique)
    pub tax_id: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub main_contact: Option<String>,
    pub specialties: Option<serde_json::Value>,
    pub contract_url: Option<String>,
    pub contract_start: Option<NaiveDate>,
    pub contract_end: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateExternalCompany {
    #[validate(length(min = 1, max = 200, message = "Legal name must be 1 to 200 characters"))]
    pub legal_name: String,
    #[validate(length(min = 1, max = 18, message = "Tax id must be 1 to 18 characters"))]
    pub tax_id: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub main_contact: Option<String>,
    pub specialties: Option<serde_json::Value>,
    pub contract_url: Option<String>,
    pub contract_start: Option<NaiveDate>,
    pub contract_end: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateExternalCompany {
    #[validate(length(min = 1, max = 200, message = "Legal name must be 1 to 200 characters"))]
    pub legal_name: Option<String>,
    #[validate(length(min = 1, max = 18, message = "Tax id must be 1 to 18 characters"))]
    pub tax_id: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub main_contact: Option<String>,
    pub specialties: Option<serde_json::Value>,
    pub contract_url: Option<String>,
    pub contract_start: Option<NaiveDate>,
    pub contract_end: Option<NaiveDate>,
}

/// Technician employed by an external company
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ExternalTechnician {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_id: Uuid,
    pub specialties: Option<serde_json::Value>,
    pub certifications: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateExternalTechnician {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_id: Uuid,
    pub specialties: Option<serde_json::Value>,
    pub certifications: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateExternalTechnician {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_id: Option<Uuid>,
    pub specialties: Option<serde_json::Value>,
    pub certifications: Option<serde_json::Value>,
}
