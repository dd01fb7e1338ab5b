//! Equipment certificates service

use chrono::{Duration, NaiveDate};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    lifecycle::Clock,
    models::certificate::{
        CertificateView, CreateCertificate, UpdateCertificate, EXPIRING_SOON_DAYS,
    },
    repository::Repository,
};

/// Longest look-ahead accepted by the expiring query
const MAX_EXPIRING_DAYS: i64 = 3650;

#[derive(Clone)]
pub struct CertificatesService {
    repository: Repository,
    clock: Arc<dyn Clock>,
}

impl CertificatesService {
    pub fn new(repository: Repository, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    fn today(&self) -> NaiveDate {
        self.clock.now().date_naive()
    }

    pub async fn list(&self, equipment_id: Option<Uuid>) -> AppResult<Vec<CertificateView>> {
        let today = self.today();
        let rows = self.repository.certificates.list(equipment_id).await?;
        Ok(rows
            .into_iter()
            .map(|c| CertificateView::new(c, today))
            .collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<CertificateView> {
        let certificate = self.repository.certificates.get_by_id(id).await?;
        Ok(CertificateView::new(certificate, self.today()))
    }

    /// Certificates still valid today and expiring within `days`
    pub async fn expiring(&self, days: Option<i64>) -> AppResult<Vec<CertificateView>> {
        let days = days.unwrap_or(EXPIRING_SOON_DAYS);
        if !(0..=MAX_EXPIRING_DAYS).contains(&days) {
            return Err(AppError::BadRequest(format!(
                "days must be between 0 and {}",
                MAX_EXPIRING_DAYS
            )));
        }
        let today = self.today();
        let rows = self
            .repository
            .certificates
            .expiring_between(today, today + Duration::days(days))
            .await?;
        Ok(rows
            .into_iter()
            .map(|c| CertificateView::new(c, today))
            .collect())
    }

    pub async fn create(&self, data: &CreateCertificate) -> AppResult<CertificateView> {
        data.validate()?;
        self.check_equipment(data.equipment_id).await?;

        let certificate = self.repository.certificates.create(data).await?;
        tracing::info!(
            certificate_id = %certificate.id,
            equipment_id = %certificate.equipment_id,
            expires_on = %certificate.expires_on,
            "Certificate registered"
        );
        Ok(CertificateView::new(certificate, self.today()))
    }

    pub async fn update(&self, id: Uuid, data: &UpdateCertificate) -> AppResult<CertificateView> {
        data.validate()?;
        let current = self.repository.certificates.get_by_id(id).await?;
        check_dates(
            data.issued_on.unwrap_or(current.issued_on),
            data.expires_on.unwrap_or(current.expires_on),
        )?;
        if let Some(equipment_id) = data.equipment_id {
            self.check_equipment(equipment_id).await?;
        }

        let certificate = self.repository.certificates.update(id, data).await?;
        Ok(CertificateView::new(certificate, self.today()))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.certificates.delete(id).await
    }

    async fn check_equipment(&self, equipment_id: Uuid) -> AppResult<()> {
        if !self.repository.equipment.exists(equipment_id).await? {
            return Err(AppError::NotFound(format!("Equipment {} not found", equipment_id)));
        }
        Ok(())
    }
}

fn check_dates(issued_on: NaiveDate, expires_on: NaiveDate) -> AppResult<()> {
    if expires_on < issued_on {
        return Err(AppError::Validation(
            "Expiry date cannot be earlier than issue date".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_dates() {
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        assert!(check_dates(d("2024-01-01"), d("2025-01-01")).is_ok());
        assert!(check_dates(d("2024-01-01"), d("2024-01-01")).is_ok());
        assert!(matches!(
            check_dates(d("2024-06-01"), d("2024-01-01")),
            Err(AppError::Validation(_))
        ));
    }
}
