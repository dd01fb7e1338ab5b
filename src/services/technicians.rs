//! Internal technicians and external service providers

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::technician::{
        CreateExternalCompany, CreateExternalTechnician, CreateTechnician, ExternalCompany,
        ExternalTechnician, Technician, UpdateExternalCompany, UpdateExternalTechnician,
        UpdateTechnician,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct TechniciansService {
    repository: Repository,
}

impl TechniciansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // Internal technicians

    pub async fn list(&self, available_only: bool) -> AppResult<Vec<Technician>> {
        self.repository.technicians.list(available_only).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Technician> {
        self.repository.technicians.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateTechnician) -> AppResult<Technician> {
        data.validate()?;
        let technician = self.repository.technicians.create(data).await?;
        tracing::info!(technician_id = %technician.id, "Technician registered");
        Ok(technician)
    }

    pub async fn update(&self, id: Uuid, data: &UpdateTechnician) -> AppResult<Technician> {
        data.validate()?;
        self.repository.technicians.update(id, data).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.technicians.delete(id).await
    }

    // External companies

    pub async fn list_companies(&self) -> AppResult<Vec<ExternalCompany>> {
        self.repository.external_companies.list().await
    }

    pub async fn get_company(&self, id: Uuid) -> AppResult<ExternalCompany> {
        self.repository.external_companies.get_by_id(id).await
    }

    pub async fn create_company(&self, data: &CreateExternalCompany) -> AppResult<ExternalCompany> {
        data.validate()?;
        self.repository.external_companies.create(data).await
    }

    pub async fn update_company(
        &self,
        id: Uuid,
        data: &UpdateExternalCompany,
    ) -> AppResult<ExternalCompany> {
        data.validate()?;
        self.repository.external_companies.update(id, data).await
    }

    pub async fn delete_company(&self, id: Uuid) -> AppResult<()> {
        self.repository.external_companies.delete(id).await
    }

    // External technicians

    pub async fn list_external(&self, company_id: Option<Uuid>) -> AppResult<Vec<ExternalTechnician>> {
        self.repository.external_technicians.list(company_id).await
    }

    pub async fn get_external(&self, id: Uuid) -> AppResult<ExternalTechnician> {
        self.repository.external_technicians.get_by_id(id).await
    }

    pub async fn create_external(
        &self,
        data: &CreateExternalTechnician,
    ) -> AppResult<ExternalTechnician> {
        data.validate()?;
        self.check_company(Some(data.company_id)).await?;
        self.repository.external_technicians.create(data).await
    }

    pub async fn update_external(
        &self,
        id: Uuid,
        data: &UpdateExternalTechnician,
    ) -> AppResult<ExternalTechnician> {
        data.validate()?;
        self.check_company(data.company_id).await?;
        self.repository.external_technicians.update(id, data).await
    }

    pub async fn delete_external(&self, id: Uuid) -> AppResult<()> {
        self.repository.external_technicians.delete(id).await
    }

    async fn check_company(&self, company_id: Option<Uuid>) -> AppResult<()> {
        if let Some(id) = company_id {
            if !self.repository.external_companies.exists(id).await? {
                return Err(AppError::NotFound(format!("External company {} not found", id)));
            }
        }
        Ok(())
    }
}
