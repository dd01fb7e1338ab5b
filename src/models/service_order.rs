//! Service order model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::enums::{Priority, ServiceOrderStatus, ServiceType};
use crate::error::{AppError, AppResult};

/// User-initiated request for service against one piece of equipment
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ServiceOrder {
    pub id: Uuid,
    /// Human-readable sequential code (SO-000001)
    pub code: String,
    pub equipment_id: Uuid,
    pub department_id: Uuid,
    pub requester_id: Uuid,
    pub service_type: ServiceType,
    pub problem_description: String,
    pub priority: Priority,
    pub status: ServiceOrderStatus,
    pub opened_at: DateTime<Utc>,
    /// First time the order reached ASSIGNED
    pub assigned_at: Option<DateTime<Utc>>,
    /// First time the order reached IN_PROGRESS
    pub started_at: Option<DateTime<Utc>>,
    /// First time the order reached COMPLETED
    pub completed_at: Option<DateTime<Utc>>,
    /// Maintenance record resolving this order
    pub maintenance_id: Option<Uuid>,
    pub attachment_urls: Option<serde_json::Value>,
    pub notes: Option<String>,
    /// 1 to 5, only once COMPLETED
    pub satisfaction_rating: Option<i16>,
    pub satisfaction_comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Short service order representation for lists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ServiceOrderShort {
    pub id: Uuid,
    pub code: String,
    pub equipment_id: Uuid,
    pub equipment_name: Option<String>,
    pub department_name: Option<String>,
    pub requester_name: Option<String>,
    pub service_type: ServiceType,
    pub priority: Priority,
    pub status: ServiceOrderStatus,
    pub opened_at: DateTime<Utc>,
}

/// Service order with resolved names, for the detail endpoint
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ServiceOrderDetails {
    #[serde(flatten)]
    pub order: ServiceOrder,
    pub equipment_name: Option<String>,
    pub department_name: Option<String>,
    pub requester_name: Option<String>,
}

/// Create service order request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateServiceOrder {
    pub equipment_id: Uuid,
    pub department_id: Uuid,
    pub requester_id: Uuid,
    pub service_type: ServiceType,
    #[validate(length(min = 1, message = "Problem description is required"))]
    pub problem_description: String,
    pub priority: Option<Priority>,
    /// Initial status label (default OPEN)
    pub status: Option<String>,
    pub attachment_urls: Option<serde_json::Value>,
    pub notes: Option<String>,
}

/// Full update request; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateServiceOrder {
    pub equipment_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub requester_id: Option<Uuid>,
    pub service_type: Option<ServiceType>,
    #[validate(length(min = 1, message = "Problem description cannot be empty"))]
    pub problem_description: Option<String>,
    pub priority: Option<Priority>,
    /// New status label; runs the status-transition rules
    pub status: Option<String>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub maintenance_id: Option<Uuid>,
    pub attachment_urls: Option<serde_json::Value>,
    pub notes: Option<String>,
    /// Satisfaction rating; only accepted on COMPLETED orders
    #[schema(value_type = Option<i64>)]
    pub satisfaction_rating: Option<serde_json::Value>,
    pub satisfaction_comment: Option<String>,
}

/// Satisfaction rating request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RatingRequest {
    /// Integer from 1 to 5
    #[schema(value_type = Option<i64>)]
    pub rating: Option<serde_json::Value>,
    pub comment: Option<String>,
}

/// Accept only JSON integers as ratings
pub fn rating_as_integer(value: Option<&serde_json::Value>) -> Option<i64> {
    value.and_then(serde_json::Value::as_i64)
}

/// Code following `last` in the SO-000001 sequence
pub fn next_order_code(last: Option<&str>) -> AppResult<String> {
    let next = match last
        .and_then(|code| code.split('-').nth(1))
        .and_then(|n| n.parse::<u64>().ok())
    {
        Some(n) => n.checked_add(1).ok_or_else(|| {
            AppError::Internal("Service order code sequence exhausted".to_string())
        })?,
        None => 1,
    };
    Ok(format!("SO-{:06}", next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_next_order_code() {
        assert_eq!(next_order_code(None).unwrap(), "SO-000001");
        assert_eq!(next_order_code(Some("SO-000041")).unwrap(), "SO-000042");
        assert_eq!(next_order_code(Some("garbage")).unwrap(), "SO-000001");
    }

    #[test]
    fn test_next_order_code_past_six_digits() {
        assert_eq!(next_order_code(Some("SO-999999")).unwrap(), "SO-1000000");
        assert_eq!(next_order_code(Some("SO-1000000")).unwrap(), "SO-1000001");
    }

    #[test]
    fn test_next_order_code_overflow_is_an_error() {
        let last = format!("SO-{}", u64::MAX);
        assert!(matches!(
            next_order_code(Some(&last)),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn test_rating_as_integer() {
        assert_eq!(rating_as_integer(Some(&json!(4))), Some(4));
        assert_eq!(rating_as_integer(Some(&json!(4.5))), None);
        assert_eq!(rating_as_integer(Some(&json!("4"))), None);
        assert_eq!(rating_as_integer(None), None);
    }
}
