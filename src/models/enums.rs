//! Shared domain enums
//!
//! Every enum is stored as TEXT in PostgreSQL and serialized as its
//! SCREAMING_SNAKE_CASE label in JSON.

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Postgres};
use utoipa::ToSchema;

macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            /// Comma-separated list of accepted labels, for error messages
            pub fn allowed_values() -> String {
                Self::ALL
                    .iter()
                    .map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    _ => Err(format!(
                        "Invalid value '{}'. Allowed values: {}",
                        s,
                        Self::allowed_values()
                    )),
                }
            }
        }

        impl sqlx::Type<Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<Postgres>>::compatible(ty)
            }
        }

        impl<'r> Decode<'r, Postgres> for $name {
            fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
                let s: String = Decode::<Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl Encode<'_, Postgres> for $name {
            fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
                <&str as Encode<Postgres>>::encode(self.as_str(), buf)
            }
        }
    };
}

text_enum! {
    /// Operational status of a piece of equipment
    pub enum EquipmentStatus {
        Active => "ACTIVE",
        Inactive => "INACTIVE",
        UnderMaintenance => "UNDER_MAINTENANCE",
        Discontinued => "DISCONTINUED",
    }
}

text_enum! {
    /// How critical a piece of equipment is to clinical operations
    pub enum Criticality {
        Low => "LOW",
        Medium => "MEDIUM",
        High => "HIGH",
        Critical => "CRITICAL",
    }
}

text_enum! {
    /// Lifecycle status of a maintenance record
    pub enum MaintenanceStatus {
        Scheduled => "SCHEDULED",
        InProgress => "IN_PROGRESS",
        Completed => "COMPLETED",
        Canceled => "CANCELED",
    }
}

text_enum! {
    pub enum MaintenanceType {
        Preventive => "PREVENTIVE",
        Corrective => "CORRECTIVE",
        Calibration => "CALIBRATION",
        Verification => "VERIFICATION",
    }
}

text_enum! {
    /// Urgency shared by maintenance records and service orders
    pub enum Priority {
        Low => "LOW",
        Normal => "NORMAL",
        High => "HIGH",
        Emergency => "EMERGENCY",
    }
}

text_enum! {
    /// Lifecycle status of a service order
    pub enum ServiceOrderStatus {
        Open => "OPEN",
        Assigned => "ASSIGNED",
        InProgress => "IN_PROGRESS",
        AwaitingParts => "AWAITING_PARTS",
        Completed => "COMPLETED",
        Canceled => "CANCELED",
    }
}

text_enum! {
    pub enum ServiceType {
        PreventiveMaintenance => "PREVENTIVE_MAINTENANCE",
        CorrectiveMaintenance => "CORRECTIVE_MAINTENANCE",
        Installation => "INSTALLATION",
        Removal => "REMOVAL",
        Calibration => "CALIBRATION",
    }
}

text_enum! {
    /// User role, carried in JWT claims
    pub enum Role {
        Admin => "ADMIN",
        Manager => "MANAGER",
        Technician => "TECHNICIAN",
        Requester => "REQUESTER",
        /// Read-only access
        Viewer => "VIEWER",
    }
}

text_enum! {
    pub enum CertificateType {
        Calibration => "CALIBRATION",
        ElectricalSafety => "ELECTRICAL_SAFETY",
        Compliance => "COMPLIANCE",
        Quality => "QUALITY",
    }
}

text_enum! {
    pub enum CertificateStatus {
        Valid => "VALID",
        Expired => "EXPIRED",
        Pending => "PENDING",
    }
}

impl Default for EquipmentStatus {
    fn default() -> Self {
        EquipmentStatus::Active
    }
}

impl Default for Criticality {
    fn default() -> Self {
        Criticality::Medium
    }
}

impl Default for MaintenanceStatus {
    fn default() -> Self {
        MaintenanceStatus::Scheduled
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

impl Default for ServiceOrderStatus {
    fn default() -> Self {
        ServiceOrderStatus::Open
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Requester
    }
}

impl Default for CertificateStatus {
    fn default() -> Self {
        CertificateStatus::Valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels() {
        assert_eq!(
            "UNDER_MAINTENANCE".parse::<EquipmentStatus>().unwrap(),
            EquipmentStatus::UnderMaintenance
        );
        assert_eq!(
            "AWAITING_PARTS".parse::<ServiceOrderStatus>().unwrap(),
            ServiceOrderStatus::AwaitingParts
        );
        assert_eq!("VIEWER".parse::<Role>().unwrap(), Role::Viewer);
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("in_progress".parse::<MaintenanceStatus>().is_err());
    }

    #[test]
    fn test_invalid_value_lists_allowed() {
        let err = "BOGUS".parse::<MaintenanceStatus>().unwrap_err();
        assert!(err.contains("BOGUS"));
        assert!(err.contains("SCHEDULED, IN_PROGRESS, COMPLETED, CANCELED"));
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&CertificateType::ElectricalSafety).unwrap();
        assert_eq!(json, "\"ELECTRICAL_SAFETY\"");
        let status: ServiceOrderStatus = serde_json::from_str("\"IN_PROGRESS\"").unwrap();
        assert_eq!(status, ServiceOrderStatus::InProgress);
    }

    #[test]
    fn test_display_matches_label() {
        for status in ServiceOrderStatus::ALL {
            assert_eq!(status.to_string(), status.as_str());
            assert_eq!(status.as_str().parse::<ServiceOrderStatus>().unwrap(), *status);
        }
    }
}
