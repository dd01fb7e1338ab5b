//! Internal technicians repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::technician::{CreateTechnician, Technician, UpdateTechnician},
};

#[derive(Clone)]
pub struct TechniciansRepository {
    pool: Pool<Postgres>,
}

impl TechniciansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self, available_only: bool) -> AppResult<Vec<Technician>> {
        let rows = sqlx::query_as::<_, Technician>(
            "SELECT * FROM technicians WHERE ($1 = FALSE OR available) ORDER BY name",
        )
        .bind(available_only)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Technician> {
        sqlx::query_as::<_, Technician>("SELECT * FROM technicians WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Technician {} not found", id)))
    }

    pub async fn exists(&self, id: Uuid) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM technicians WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    pub async fn create(&self, data: &CreateTechnician) -> AppResult<Technician> {
        let row = sqlx::query_as::<_, Technician>(
            r#"
            INSERT INTO technicians (id, name, email, phone, specialties, certifications, available, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.specialties)
        .bind(&data.certifications)
        .bind(data.available.unwrap_or(true))
        .bind(data.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&self, id: Uuid, data: &UpdateTechnician) -> AppResult<Technician> {
        sqlx::query_as::<_, Technician>(
            r#"
            UPDATE technicians SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                specialties = COALESCE($5, specialties),
                certifications = COALESCE($6, certifications),
                available = COALESCE($7, available),
                user_id = COALESCE($8, user_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.specialties)
        .bind(&data.certifications)
        .bind(data.available)
        .bind(data.user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Technician {} not found", id)))
    }

    /// Delete a technician with no maintenance history
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let records: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM maintenance_records WHERE technician_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if records > 0 {
            return Err(AppError::HasDependents(format!(
                "Technician {} is assigned to {} maintenance record(s)",
                id, records
            )));
        }

        let result = sqlx::query("DELETE FROM technicians WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Technician {} not found", id)));
        }
        Ok(())
    }
}
