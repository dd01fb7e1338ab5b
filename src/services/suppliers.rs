//! Suppliers service

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::supplier::{CreateSupplier, Supplier, UpdateSupplier},
    repository::Repository,
};

#[derive(Clone)]
pub struct SuppliersService {
    repository: Repository,
}

impl SuppliersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Supplier>> {
        self.repository.suppliers.list().await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Supplier> {
        self.repository.suppliers.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateSupplier) -> AppResult<Supplier> {
        data.validate()?;
        self.repository.suppliers.create(data).await
    }

    pub async fn update(&self, id: Uuid, data: &UpdateSupplier) -> AppResult<Supplier> {
        data.validate()?;
        self.repository.suppliers.update(id, data).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.suppliers.delete(id).await
    }
}
