//! Business logic services

pub mod certificates;
pub mod departments;
pub mod equipment;
pub mod maintenance;
pub mod service_orders;
pub mod suppliers;
pub mod technicians;
pub mod users;

use std::sync::Arc;

use crate::{config::AppConfig, error::AppResult, lifecycle::Clock, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub equipment: equipment::EquipmentService,
    pub maintenance: maintenance::MaintenanceService,
    pub service_orders: service_orders::ServiceOrdersService,
    pub departments: departments::DepartmentsService,
    pub technicians: technicians::TechniciansService,
    pub suppliers: suppliers::SuppliersService,
    pub certificates: certificates::CertificatesService,
    repository: Repository,
}

impl Services {
    /// Create all services over one repository and one clock
    pub fn new(repository: Repository, config: &AppConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            users: users::UsersService::new(repository.clone(), config.auth.clone(), clock.clone()),
            equipment: equipment::EquipmentService::new(repository.clone(), config.equipment.clone()),
            maintenance: maintenance::MaintenanceService::new(repository.clone(), clock.clone()),
            service_orders: service_orders::ServiceOrdersService::new(repository.clone(), clock.clone()),
            departments: departments::DepartmentsService::new(repository.clone()),
            technicians: technicians::TechniciansService::new(repository.clone()),
            suppliers: suppliers::SuppliersService::new(repository.clone()),
            certificates: certificates::CertificatesService::new(repository.clone(), clock),
            repository,
        }
    }

    /// Database round trip for the readiness probe
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
