//! Suppliers repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::supplier::{CreateSupplier, Supplier, UpdateSupplier},
};

#[derive(Clone)]
pub struct SuppliersRepository {
    pool: Pool<Postgres>,
}

impl SuppliersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Supplier>> {
        let rows = sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers ORDER BY legal_name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Supplier> {
        sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Supplier {} not found", id)))
    }

    pub async fn create(&self, data: &CreateSupplier) -> AppResult<Supplier> {
        let row = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (id, legal_name, tax_id, address, phone, email, main_contact, categories)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
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
        .bind(&data.categories)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&self, id: Uuid, data: &UpdateSupplier) -> AppResult<Supplier> {
        sqlx::query_as::<_, Supplier>(
            r#"
            UPDATE suppliers SET
                legal_name = COALESCE($2, legal_name),
                tax_id = COALESCE($3, tax_id),
                address = COALESCE($4, address),
                phone = COALESCE($5, phone),
                email = COALESCE($6, email),
                main_contact = COALESCE($7, main_contact),
                categories = COALESCE($8, categories),
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
        .bind(&data.categories)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Supplier {} not found", id)))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Supplier {} not found", id)));
        }
        Ok(())
    }
}
