//! Departments service

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::department::{CreateDepartment, Department, UpdateDepartment},
    repository::Repository,
};

#[derive(Clone)]
pub struct DepartmentsService {
    repository: Repository,
}

impl DepartmentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Department>> {
        self.repository.departments.list().await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Department> {
        self.repository.departments.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateDepartment) -> AppResult<Department> {
        data.validate()?;
        self.check_manager(data.manager_id).await?;
        self.repository.departments.create(data).await
    }

    pub async fn update(&self, id: Uuid, data: &UpdateDepartment) -> AppResult<Department> {
        data.validate()?;
        self.check_manager(data.manager_id).await?;
        self.repository.departments.update(id, data).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.departments.delete(id).await
    }

    async fn check_manager(&self, manager_id: Option<Uuid>) -> AppResult<()> {
        if let Some(id) = manager_id {
            if !self.repository.users.exists(id).await? {
                return Err(AppError::NotFound(format!("User {} not found", id)));
            }
        }
        Ok(())
    }
}
