//! Certificates repository

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::certificate::{Certificate, CreateCertificate, UpdateCertificate},
};

#[derive(Clone)]
pub struct CertificatesRepository {
    pool: Pool<Postgres>,
}

impl CertificatesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self, equipment_id: Option<Uuid>) -> AppResult<Vec<Certificate>> {
        let rows = sqlx::query_as::<_, Certificate>(
            r#"
            SELECT * FROM certificates
            WHERE ($1::uuid IS NULL OR equipment_id = $1)
            ORDER BY expires_on
            "#,
        )
        .bind(equipment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Certificate> {
        sqlx::query_as::<_, Certificate>("SELECT * FROM certificates WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Certificate {} not found", id)))
    }

    /// Certificates expiring within [from, until]
    pub async fn expiring_between(&self, from: NaiveDate, until: NaiveDate) -> AppResult<Vec<Certificate>> {
        let rows = sqlx::query_as::<_, Certificate>(
            "SELECT * FROM certificates WHERE expires_on >= $1 AND expires_on <= $2 ORDER BY expires_on",
        )
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn create(&self, data: &CreateCertificate) -> AppResult<Certificate> {
        let row = sqlx::query_as::<_, Certificate>(
            r#"
            INSERT INTO certificates (
                id, equipment_id, certificate_type, number, issued_on, expires_on,
                issuer, document_url, notes, status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.equipment_id)
        .bind(data.certificate_type)
        .bind(&data.number)
        .bind(data.issued_on)
        .bind(data.expires_on)
        .bind(&data.issuer)
        .bind(&data.document_url)
        .bind(&data.notes)
        .bind(data.status.unwrap_or_default())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&self, id: Uuid, data: &UpdateCertificate) -> AppResult<Certificate> {
        sqlx::query_as::<_, Certificate>(
            r#"
            UPDATE certificates SET
                equipment_id = COALESCE($2, equipment_id),
                certificate_type = COALESCE($3, certificate_type),
                number = COALESCE($4, number),
                issued_on = COALESCE($5, issued_on),
                expires_on = COALESCE($6, expires_on),
                issuer = COALESCE($7, issuer),
                document_url = COALESCE($8, document_url),
                notes = COALESCE($9, notes),
                status = COALESCE($10, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.equipment_id)
        .bind(data.certificate_type)
        .bind(&data.number)
        .bind(data.issued_on)
        .bind(data.expires_on)
        .bind(&data.issuer)
        .bind(&data.document_url)
        .bind(&data.notes)
        .bind(data.status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Certificate {} not found", id)))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM certificates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Certificate {} not found", id)));
        }
        Ok(())
    }
}
