//! Maintenance record model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::enums::{MaintenanceStatus, MaintenanceType, Priority};
use crate::error::AppError;

/// Who carries out a maintenance episode.
///
/// An internal technician and an external one are mutually exclusive; an
/// external technician always comes with the company employing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Assignee {
    Internal {
        technician_id: Uuid,
    },
    External {
        technician_id: Uuid,
        company_id: Uuid,
    },
    #[default]
    Unassigned,
}

impl Assignee {
    /// Rebuild the variant from its three storage columns
    pub fn from_columns(
        technician_id: Option<Uuid>,
        external_technician_id: Option<Uuid>,
        external_company_id: Option<Uuid>,
    ) -> Result<Self, String> {
        match (technician_id, external_technician_id, external_company_id) {
            (Some(technician_id), None, None) => Ok(Assignee::Internal { technician_id }),
            (None, Some(technician_id), Some(company_id)) => Ok(Assignee::External {
                technician_id,
                company_id,
            }),
            (None, None, None) => Ok(Assignee::Unassigned),
            other => Err(format!("Inconsistent technician columns: {:?}", other)),
        }
    }

    /// Split into (technician_id, external_technician_id, external_company_id)
    pub fn to_columns(&self) -> (Option<Uuid>, Option<Uuid>, Option<Uuid>) {
        match *self {
            Assignee::Internal { technician_id } => (Some(technician_id), None, None),
            Assignee::External {
                technician_id,
                company_id,
            } => (None, Some(technician_id), Some(company_id)),
            Assignee::Unassigned => (None, None, None),
        }
    }
}

/// Assignment as requested by a client. The company of an external
/// technician is resolved server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssignTo {
    Internal { technician_id: Uuid },
    External { technician_id: Uuid },
    Unassigned,
}

/// Row structure for the maintenance_records table
#[derive(Debug, Clone, FromRow)]
pub struct MaintenanceRow {
    id: Uuid,
    equipment_id: Uuid,
    maintenance_type: MaintenanceType,
    status: MaintenanceStatus,
    priority: Priority,
    description: String,
    scheduled_at: DateTime<Utc>,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    technician_id: Option<Uuid>,
    external_technician_id: Option<Uuid>,
    external_company_id: Option<Uuid>,
    labor_cost: Decimal,
    parts_cost: Decimal,
    total_cost: Decimal,
    downtime_minutes: Option<i32>,
    notes: Option<String>,
    replaced_parts: Option<serde_json::Value>,
    attachment_urls: Option<serde_json::Value>,
    manager_signature_url: Option<String>,
    technician_signature_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MaintenanceRow> for MaintenanceRecord {
    type Error = AppError;

    fn try_from(row: MaintenanceRow) -> Result<Self, Self::Error> {
        let assignee = Assignee::from_columns(
            row.technician_id,
            row.external_technician_id,
            row.external_company_id,
        )
        .map_err(AppError::Internal)?;

        Ok(MaintenanceRecord {
            id: row.id,
            equipment_id: row.equipment_id,
            maintenance_type: row.maintenance_type,
            status: row.status,
            priority: row.priority,
            description: row.description,
            scheduled_at: row.scheduled_at,
            start_time: row.start_time,
            end_time: row.end_time,
            assignee,
            labor_cost: row.labor_cost,
            parts_cost: row.parts_cost,
            total_cost: row.total_cost,
            downtime_minutes: row.downtime_minutes,
            notes: row.notes,
            replaced_parts: row.replaced_parts,
            attachment_urls: row.attachment_urls,
            manager_signature_url: row.manager_signature_url,
            technician_signature_url: row.technician_signature_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// One maintenance episode against one piece of equipment
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MaintenanceRecord {
    pub id: Uuid,
    pub equipment_id: Uuid,
    pub maintenance_type: MaintenanceType,
    pub status: MaintenanceStatus,
    pub priority: Priority,
    pub description: String,
    pub scheduled_at: DateTime<Utc>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[schema(value_type = Object)]
    pub assignee: Assignee,
    #[schema(value_type = String)]
    pub labor_cost: Decimal,
    #[schema(value_type = String)]
    pub parts_cost: Decimal,
    #[schema(value_type = String)]
    pub total_cost: Decimal,
    /// Minutes the equipment was unavailable
    pub downtime_minutes: Option<i32>,
    pub notes: Option<String>,
    pub replaced_parts: Option<serde_json::Value>,
    pub attachment_urls: Option<serde_json::Value>,
    pub manager_signature_url: Option<String>,
    pub technician_signature_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Maintenance record with resolved names, for the detail endpoint
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MaintenanceDetails {
    #[serde(flatten)]
    pub record: MaintenanceRecord,
    pub equipment_name: Option<String>,
    pub technician_name: Option<String>,
    pub external_company_name: Option<String>,
    /// Total cost formatted in Brazilian reais
    pub total_cost_display: String,
}

/// Short maintenance representation for lists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaintenanceShort {
    pub id: Uuid,
    pub equipment_id: Uuid,
    pub equipment_name: Option<String>,
    pub maintenance_type: MaintenanceType,
    pub status: MaintenanceStatus,
    pub priority: Priority,
    pub scheduled_at: DateTime<Utc>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Internal or external technician name
    pub technician_name: Option<String>,
    #[schema(value_type = String)]
    pub total_cost: Decimal,
}

/// Create maintenance request
/// An end time, when both are known, cannot precede the start time
pub fn check_times(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), ValidationError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            let mut err = ValidationError::new("times");
            err.message = Some("End time cannot be earlier than start time".into());
            return Err(err);
        }
    }
    Ok(())
}

fn validate_create_times(data: &CreateMaintenance) -> Result<(), ValidationError> {
    check_times(data.start_time, data.end_time)
}

fn validate_update_times(data: &UpdateMaintenance) -> Result<(), ValidationError> {
    check_times(data.start_time, data.end_time)
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_create_times"))]
pub struct CreateMaintenance {
    pub equipment_id: Uuid,
    pub maintenance_type: MaintenanceType,
    /// Initial status label (default SCHEDULED)
    pub status: Option<String>,
    pub priority: Option<Priority>,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    /// Defaults to now
    pub scheduled_at: Option<DateTime<Utc>>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[schema(value_type = Option<Object>)]
    pub assignee: Option<AssignTo>,
    #[schema(value_type = Option<String>)]
    pub labor_cost: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub parts_cost: Option<Decimal>,
    /// Defaults to labor + parts
    #[schema(value_type = Option<String>)]
    pub total_cost: Option<Decimal>,
    #[validate(range(min = 0, message = "Downtime cannot be negative"))]
    pub downtime_minutes: Option<i32>,
    pub notes: Option<String>,
    pub replaced_parts: Option<serde_json::Value>,
    pub attachment_urls: Option<serde_json::Value>,
    pub manager_signature_url: Option<String>,
    pub technician_signature_url: Option<String>,
}

/// Full update request; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_update_times"))]
pub struct UpdateMaintenance {
    pub equipment_id: Option<Uuid>,
    pub maintenance_type: Option<MaintenanceType>,
    /// New status label; runs the status-transition rules
    pub status: Option<String>,
    pub priority: Option<Priority>,
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[schema(value_type = Option<Object>)]
    pub assignee: Option<AssignTo>,
    #[schema(value_type = Option<String>)]
    pub labor_cost: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub parts_cost: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub total_cost: Option<Decimal>,
    #[validate(range(min = 0, message = "Downtime cannot be negative"))]
    pub downtime_minutes: Option<i32>,
    pub notes: Option<String>,
    pub replaced_parts: Option<serde_json::Value>,
    pub attachment_urls: Option<serde_json::Value>,
    pub manager_signature_url: Option<String>,
    pub technician_signature_url: Option<String>,
}

/// Query for maintenance scheduled in a period
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct PeriodQuery {
    /// Period start (RFC 3339), required
    pub start: Option<DateTime<Utc>>,
    /// Period end (RFC 3339), defaults to now
    pub end: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_end_before_start_fails_validation() {
        let start = Utc::now();
        let update = UpdateMaintenance {
            start_time: Some(start),
            end_time: Some(start - Duration::minutes(5)),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = UpdateMaintenance {
            start_time: Some(start),
            end_time: Some(start + Duration::minutes(5)),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_check_times_needs_both_ends() {
        let now = Utc::now();
        assert!(check_times(Some(now), None).is_ok());
        assert!(check_times(None, Some(now)).is_ok());
        assert!(check_times(Some(now), Some(now)).is_ok());
    }

    #[test]
    fn test_assignee_columns_roundtrip() {
        let t = Uuid::new_v4();
        let c = Uuid::new_v4();
        for assignee in [
            Assignee::Internal { technician_id: t },
            Assignee::External {
                technician_id: t,
                company_id: c,
            },
            Assignee::Unassigned,
        ] {
            let (a, b, d) = assignee.to_columns();
            assert_eq!(Assignee::from_columns(a, b, d).unwrap(), assignee);
        }
    }

    #[test]
    fn test_assignee_rejects_both_technicians() {
        let result = Assignee::from_columns(
            Some(Uuid::new_v4()),
            Some(Uuid::new_v4()),
            Some(Uuid::new_v4()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_assignee_rejects_external_without_company() {
        assert!(Assignee::from_columns(None, Some(Uuid::new_v4()), None).is_err());
    }

    #[test]
    fn test_assign_to_wire_format() {
        let id = Uuid::new_v4();
        let parsed: AssignTo = serde_json::from_value(serde_json::json!({
            "kind": "external",
            "technician_id": id,
        }))
        .unwrap();
        assert_eq!(parsed, AssignTo::External { technician_id: id });

        let parsed: AssignTo =
            serde_json::from_value(serde_json::json!({ "kind": "unassigned" })).unwrap();
        assert_eq!(parsed, AssignTo::Unassigned);
    }

    #[test]
    fn test_assignee_serializes_tagged() {
        let json = serde_json::to_value(Assignee::Unassigned).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "unassigned" }));
    }
}
