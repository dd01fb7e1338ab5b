//! Equipment service

use uuid::Uuid;
use validator::Validate;

use crate::{
    config::EquipmentConfig,
    error::{AppError, AppResult},
    models::{
        enums::EquipmentStatus,
        equipment::{
            qr_code_url, CreateEquipment, Equipment, EquipmentShort, MaintenanceHistoryEntry,
            QrCodeResponse, UpdateEquipment,
        },
        page::PageQuery,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
    config: EquipmentConfig,
}

impl EquipmentService {
    pub fn new(repository: Repository, config: EquipmentConfig) -> Self {
        Self { repository, config }
    }

    pub async fn list(&self, page: &PageQuery) -> AppResult<(Vec<EquipmentShort>, i64)> {
        self.repository.equipment.list(page).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Equipment> {
        self.repository.equipment.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateEquipment) -> AppResult<Equipment> {
        data.validate()?;
        self.repository.departments.get_by_id(data.department_id).await?;

        let id = Uuid::new_v4();
        let qr_code = data
            .generate_qr_code
            .then(|| qr_code_url(&self.config.qr_base_url, id));

        let equipment = self
            .repository
            .equipment
            .create(id, data, qr_code.as_deref())
            .await?;
        tracing::info!(equipment_id = %equipment.id, code = %equipment.code, "Equipment registered");
        Ok(equipment)
    }

    pub async fn update(&self, id: Uuid, data: &UpdateEquipment) -> AppResult<Equipment> {
        data.validate()?;
        if let Some(department_id) = data.department_id {
            self.repository.departments.get_by_id(department_id).await?;
        }

        let qr_code = data
            .generate_qr_code
            .then(|| qr_code_url(&self.config.qr_base_url, id));

        self.repository
            .equipment
            .update(id, data, qr_code.as_deref())
            .await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.equipment.delete(id).await
    }

    pub async fn history(&self, id: Uuid) -> AppResult<Vec<MaintenanceHistoryEntry>> {
        if !self.repository.equipment.exists(id).await? {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        self.repository.equipment.history(id).await
    }

    /// Store and return the URL the equipment QR code encodes
    pub async fn generate_qr_code(&self, id: Uuid) -> AppResult<QrCodeResponse> {
        let url = qr_code_url(&self.config.qr_base_url, id);
        let equipment = self.repository.equipment.set_qr_code(id, &url).await?;
        Ok(QrCodeResponse {
            id: equipment.id,
            qr_code_url: url,
        })
    }

    pub async fn by_department(&self, department_id: Uuid) -> AppResult<Vec<EquipmentShort>> {
        self.repository.departments.get_by_id(department_id).await?;
        self.repository.equipment.by_department(department_id).await
    }

    /// Equipment in a status given as a case-insensitive label
    pub async fn by_status(&self, status: &str) -> AppResult<Vec<EquipmentShort>> {
        let status: EquipmentStatus = status
            .to_uppercase()
            .parse()
            .map_err(AppError::InvalidStatus)?;
        self.repository.equipment.by_status(status).await
    }

    pub async fn search(&self, term: Option<&str>) -> AppResult<Vec<EquipmentShort>> {
        let term = term.map(str::trim).unwrap_or_default();
        if term.is_empty() {
            return Err(AppError::BadRequest("Search term is required".to_string()));
        }
        self.repository.equipment.search(term).await
    }
}
