//! Certificate model (calibration, electrical safety and other regulatory documents)

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::enums::{CertificateStatus, CertificateType};

/// Regulatory certificate attached to one piece of equipment
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Certificate {
    pub id: Uuid,
    pub equipment_id: Uuid,
    pub certificate_type: CertificateType,
    pub number: Option<String>,
    pub issued_on: NaiveDate,
    pub expires_on: NaiveDate,
    pub issuer: String,
    pub document_url: Option<String>,
    pub notes: Option<String>,
    pub status: CertificateStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Certificate {
    /// Expired strictly before `today`
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expires_on < today
    }

    /// Not expired yet, but expiring within `days` of `today`
    pub fn is_expiring_soon(&self, today: NaiveDate, days: i64) -> bool {
        !self.is_expired(today) && self.expires_on <= today + Duration::days(days)
    }
}

/// Certificate with computed expiry flags
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CertificateView {
    #[serde(flatten)]
    pub certificate: Certificate,
    pub expired: bool,
    pub expiring_soon: bool,
}

/// Window used for the `expiring_soon` flag
pub const EXPIRING_SOON_DAYS: i64 = 30;

impl CertificateView {
    pub fn new(certificate: Certificate, today: NaiveDate) -> Self {
        let expired = certificate.is_expired(today);
        let expiring_soon = certificate.is_expiring_soon(today, EXPIRING_SOON_DAYS);
        Self {
            certificate,
            expired,
            expiring_soon,
        }
    }
}

fn validate_dates(data: &CreateCertificate) -> Result<(), ValidationError> {
    if data.expires_on < data.issued_on {
        let mut err = ValidationError::new("dates");
        err.message = Some("Expiry date cannot be earlier than issue date".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_dates"))]
pub struct CreateCertificate {
    pub equipment_id: Uuid,
    pub certificate_type: CertificateType,
    pub number: Option<String>,
    pub issued_on: NaiveDate,
    pub expires_on: NaiveDate,
    #[validate(length(min = 1, max = 100, message = "Issuer must be 1 to 100 characters"))]
    pub issuer: String,
    pub document_url: Option<String>,
    pub notes: Option<String>,
    pub status: Option<CertificateStatus>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCertificate {
    pub equipment_id: Option<Uuid>,
    pub certificate_type: Option<CertificateType>,
    pub number: Option<String>,
    pub issued_on: Option<NaiveDate>,
    pub expires_on: Option<NaiveDate>,
    #[validate(length(min = 1, max = 100, message = "Issuer must be 1 to 100 characters"))]
    pub issuer: Option<String>,
    pub document_url: Option<String>,
    pub notes: Option<String>,
    pub status: Option<CertificateStatus>,
}

/// Query for certificates about to expire
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ExpiringQuery {
    /// Window in days (default 30)
    pub days: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn certificate(issued: NaiveDate, expires: NaiveDate) -> Certificate {
        Certificate {
            id: Uuid::new_v4(),
            equipment_id: Uuid::new_v4(),
            certificate_type: CertificateType::Calibration,
            number: Some("CAL-1".to_string()),
            issued_on: issued,
            expires_on: expires,
            issuer: "INMETRO".to_string(),
            document_url: None,
            notes: None,
            status: CertificateStatus::Valid,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_expiry_flags() {
        let today = date(2024, 6, 1);
        let cert = certificate(date(2023, 6, 1), date(2024, 6, 20));
        assert!(!cert.is_expired(today));
        assert!(cert.is_expiring_soon(today, 30));
        assert!(!cert.is_expiring_soon(today, 10));
    }

    #[test]
    fn test_expires_today_is_not_expired() {
        let today = date(2024, 6, 1);
        let cert = certificate(date(2023, 6, 1), today);
        assert!(!cert.is_expired(today));
        assert!(cert.is_expired(date(2024, 6, 2)));
    }

    #[test]
    fn test_expired_is_not_expiring_soon() {
        let today = date(2024, 6, 1);
        let view = CertificateView::new(certificate(date(2023, 1, 1), date(2024, 5, 1)), today);
        assert!(view.expired);
        assert!(!view.expiring_soon);
    }

    #[test]
    fn test_create_rejects_inverted_dates() {
        let data = CreateCertificate {
            equipment_id: Uuid::new_v4(),
            certificate_type: CertificateType::Quality,
            number: None,
            issued_on: date(2024, 6, 1),
            expires_on: date(2024, 5, 1),
            issuer: "Lab".to_string(),
            document_url: None,
            notes: None,
            status: None,
        };
        assert!(data.validate().is_err());
    }
}
