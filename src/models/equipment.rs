//! Equipment model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::enums::{Criticality, EquipmentStatus, MaintenanceStatus, MaintenanceType};

/// Managed clinical device
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: Uuid,
    /// Internal inventory code (unique)
    pub code: String,
    pub name: String,
    pub model: String,
    pub manufacturer: String,
    /// Manufacturer serial number (unique)
    pub serial_number: String,
    pub acquired_on: NaiveDate,
    pub warranty_until: Option<NaiveDate>,
    #[schema(value_type = Option<String>)]
    pub acquisition_value: Option<Decimal>,
    pub department_id: Uuid,
    pub location: Option<String>,
    pub status: EquipmentStatus,
    pub criticality: Criticality,
    pub last_maintenance_date: Option<NaiveDate>,
    pub next_planned_maintenance: Option<NaiveDate>,
    pub technical_specs: Option<serde_json::Value>,
    pub documentation: Option<serde_json::Value>,
    pub image_urls: Option<serde_json::Value>,
    /// URL encoded into the equipment QR code
    pub qr_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Short equipment representation for lists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EquipmentShort {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub model: String,
    pub manufacturer: String,
    pub serial_number: String,
    pub status: EquipmentStatus,
    pub criticality: Criticality,
    pub department_id: Uuid,
    pub department_name: Option<String>,
    pub next_planned_maintenance: Option<NaiveDate>,
}

/// One line of an equipment's maintenance history
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaintenanceHistoryEntry {
    pub id: Uuid,
    pub maintenance_type: MaintenanceType,
    pub status: MaintenanceStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub technician_name: Option<String>,
    #[schema(value_type = String)]
    pub total_cost: Decimal,
    pub downtime_minutes: Option<i32>,
}

/// Create equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEquipment {
    #[validate(length(min = 1, max = 50, message = "Code must be 1 to 50 characters"))]
    pub code: String,
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "Model is required"))]
    pub model: String,
    #[validate(length(min = 1, max = 100, message = "Manufacturer is required"))]
    pub manufacturer: String,
    #[validate(length(min = 1, max = 100, message = "Serial number is required"))]
    pub serial_number: String,
    pub acquired_on: NaiveDate,
    pub warranty_until: Option<NaiveDate>,
    #[schema(value_type = Option<String>)]
    pub acquisition_value: Option<Decimal>,
    pub department_id: Uuid,
    pub location: Option<String>,
    pub status: Option<EquipmentStatus>,
    pub criticality: Option<Criticality>,
    pub next_planned_maintenance: Option<NaiveDate>,
    pub technical_specs: Option<serde_json::Value>,
    pub documentation: Option<serde_json::Value>,
    pub image_urls: Option<serde_json::Value>,
    /// Store the QR code URL right away
    #[serde(default)]
    pub generate_qr_code: bool,
}

/// Update equipment request; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateEquipment {
    #[validate(length(min = 1, max = 50, message = "Code must be 1 to 50 characters"))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: Option<String>,
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    pub serial_number: Option<String>,
    pub acquired_on: Option<NaiveDate>,
    pub warranty_until: Option<NaiveDate>,
    #[schema(value_type = Option<String>)]
    pub acquisition_value: Option<Decimal>,
    pub department_id: Option<Uuid>,
    pub location: Option<String>,
    pub status: Option<EquipmentStatus>,
    pub criticality: Option<Criticality>,
    pub next_planned_maintenance: Option<NaiveDate>,
    pub technical_specs: Option<serde_json::Value>,
    pub documentation: Option<serde_json::Value>,
    pub image_urls: Option<serde_json::Value>,
    #[serde(default)]
    pub generate_qr_code: bool,
}

/// Free-text equipment search
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EquipmentSearchQuery {
    /// Matched against code, name, model, manufacturer and serial number
    pub term: Option<String>,
}

/// QR code generation response
#[derive(Debug, Serialize, ToSchema)]
pub struct QrCodeResponse {
    pub id: Uuid,
    pub qr_code_url: String,
}

/// URL a QR code for the given equipment points to
pub fn qr_code_url(base_url: &str, id: Uuid) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qr_code_url_trims_slash() {
        let id = Uuid::nil();
        assert_eq!(
            qr_code_url("https://example.org/equipment/", id),
            format!("https://example.org/equipment/{}", id)
        );
    }

    #[test]
    fn test_create_validation() {
        let data: CreateEquipment = serde_json::from_value(serde_json::json!({
            "code": "X".repeat(51),
            "name": "Ventilator",
            "model": "V500",
            "manufacturer": "Acme",
            "serial_number": "SN-1",
            "acquired_on": "2024-01-10",
            "department_id": Uuid::nil(),
        }))
        .unwrap();
        assert!(data.validate().is_err());
        assert!(!data.generate_qr_code);
    }

    #[test]
    fn test_unknown_status_rejected() {
        let result: Result<UpdateEquipment, _> =
            serde_json::from_value(serde_json::json!({ "status": "BROKEN" }));
        assert!(result.is_err());
    }
}
