//! Repository layer for database operations
//!
//! Methods that take part in a status change accept an explicit
//! `&mut PgConnection`, obtained from the caller's transaction. The others
//! run against the pool.

pub mod certificates;
pub mod departments;
pub mod equipment;
pub mod external_providers;
pub mod maintenance;
pub mod service_orders;
pub mod suppliers;
pub mod technicians;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub equipment: equipment::EquipmentRepository,
    pub maintenance: maintenance::MaintenanceRepository,
    pub service_orders: service_orders::ServiceOrdersRepository,
    pub departments: departments::DepartmentsRepository,
    pub technicians: technicians::TechniciansRepository,
    pub external_companies: external_providers::ExternalCompaniesRepository,
    pub external_technicians: external_providers::ExternalTechniciansRepository,
    pub suppliers: suppliers::SuppliersRepository,
    pub certificates: certificates::CertificatesRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            equipment: equipment::EquipmentRepository::new(pool.clone()),
            maintenance: maintenance::MaintenanceRepository::new(pool.clone()),
            service_orders: service_orders::ServiceOrdersRepository::new(pool.clone()),
            departments: departments::DepartmentsRepository::new(pool.clone()),
            technicians: technicians::TechniciansRepository::new(pool.clone()),
            external_companies: external_providers::ExternalCompaniesRepository::new(pool.clone()),
            external_technicians: external_providers::ExternalTechniciansRepository::new(
                pool.clone(),
            ),
            suppliers: suppliers::SuppliersRepository::new(pool.clone()),
            certificates: certificates::CertificatesRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }

    /// Check database connectivity
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
