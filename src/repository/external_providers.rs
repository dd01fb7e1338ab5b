//! External maintenance companies and their technicians

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::technician::{
        CreateExternalCompany, CreateExternalTechnician, ExternalCompany, ExternalTechnician,
        UpdateExternalCompany, UpdateExternalTechnician,
    },
};

#[derive(Clone)]
pub struct ExternalCompaniesRepository {
    pool: Pool<Postgres>,
}

impl ExternalCompaniesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<ExternalCompany>> {
        let rows =
            sqlx::query_as::<_, ExternalCompany>("SELECT * FROM external_companies ORDER BY legal_name")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<ExternalCompany> {
        sqlx::query_as::<_, ExternalCompany>("SELECT * FROM external_companies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("External company {} not found", id)))
    }

    pub async fn exists(&self, id: Uuid) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM external_companies WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    pub async fn create(&self, data: &CreateExternalCompany) -> AppResult<ExternalCompany> {
        let row = sqlx::query_as::<_, ExternalCompany>(
            r#"
            INSERT INTO external_companies (
                id, legal_name, tax_id, address, phone, email, main_contact,
                specialties, contract_url, contract_start, contract_end
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.legal_name)
        .bind(&data.tax_id)
        .bind(&data.address)
        .bind(&data.phone)
        .bind(&data.email)
        .bind(&data.main_contact)
        .bind(&data.specialties)
        .bind(&data.contract_url)
        .bind(data.contract_start)
        .bind(data.contract_end)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&self, id: Uuid, data: &UpdateExternalCompany) -> AppResult<ExternalCompany> {
        sqlx::query_as::<_, ExternalCompany>(
            r#"
            UPDATE external_companies SET
                legal_name = COALESCE($2, legal_name),
                tax_id = COALESCE($3, tax_id),
                address = COALESCE($4, address),
                phone = COALESCE($5, phone),
                email = COALESCE($6, email),
                main_contact = COALESCE($7, main_contact),
                specialties = COALESCE($8, specialties),
                contract_url = COALESCE($9, contract_url),
                contract_start = COALESCE($10, contract_start),
                contract_end = COALESCE($11, contract_end),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.legal_name)
        .bind(&data.tax_id)
        .bind(&data.address)
        .bind(&data.phone)
        .bind(&data.email)
        .bind(&data.main_contact)
        .bind(&data.specialties)
        .bind(&data.contract_url)
        .bind(data.contract_start)
        .bind(data.contract_end)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("External company {} not found", id)))
    }

    /// Delete a company with no technicians nor maintenance history
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let (technicians, records): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM external_technicians WHERE company_id = $1),
                (SELECT COUNT(*) FROM maintenance_records WHERE external_company_id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        if technicians > 0 || records > 0 {
            return Err(AppError::HasDependents(format!(
                "External company {} has {} technician(s) and {} maintenance record(s)",
                id, technicians, records
            )));
        }

        let result = sqlx::query("DELETE FROM external_companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("External company {} not found", id)));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct ExternalTechniciansRepository {
    pool: Pool<Postgres>,
}

impl ExternalTechniciansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self, company_id: Option<Uuid>) -> AppResult<Vec<ExternalTechnician>> {
        let rows = sqlx::query_as::<_, ExternalTechnician>(
            "SELECT * FROM external_technicians WHERE ($1::uuid IS NULL OR company_id = $1) ORDER BY name",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<ExternalTechnician> {
        sqlx::query_as::<_, ExternalTechnician>("SELECT * FROM external_technicians WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("External technician {} not found", id)))
    }

    pub async fn create(&self, data: &CreateExternalTechnician) -> AppResult<ExternalTechnician> {
        let row = sqlx::query_as::<_, ExternalTechnician>(
            r#"
            INSERT INTO external_technicians (id, name, email, phone, company_id, specialties, certifications)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(data.company_id)
        .bind(&data.specialties)
        .bind(&data.certifications)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(
        &self,
        id: Uuid,
        data: &UpdateExternalTechnician,
    ) -> AppResult<ExternalTechnician> {
        sqlx::query_as::<_, ExternalTechnician>(
            r#"
            UPDATE external_technicians SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                company_id = COALESCE($5, company_id),
                specialties = COALESCE($6, specialties),
                certifications = COALESCE($7, certifications),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(data.company_id)
        .bind(&data.specialties)
        .bind(&data.certifications)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("External technician {} not found", id)))
    }

    /// Delete an external technician with no maintenance history
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let records: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM maintenance_records WHERE external_technician_id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        if records > 0 {
            return Err(AppError::HasDependents(format!(
                "External technician {} is assigned to {} maintenance record(s)",
                id, records
            )));
        }

        let result = sqlx::query("DELETE FROM external_technicians WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("External technician {} not found", id)));
        }
        Ok(())
    }
}
