//! Maintenance records repository

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        maintenance::{MaintenanceRecord, MaintenanceRow, MaintenanceShort},
        page::PageQuery,
    },
};

const SHORT_SELECT: &str = r#"
    SELECT m.id, m.equipment_id, e.name AS equipment_name, m.maintenance_type,
           m.status, m.priority, m.scheduled_at, m.start_time, m.end_time,
           COALESCE(t.name, et.name) AS technician_name, m.total_cost
    FROM maintenance_records m
    LEFT JOIN equipment e ON e.id = m.equipment_id
    LEFT JOIN technicians t ON t.id = m.technician_id
    LEFT JOIN external_technicians et ON et.id = m.external_technician_id
"#;

/// Names shown next to a maintenance record on the detail endpoint
#[derive(Debug, Default, sqlx::FromRow)]
pub struct MaintenanceNames {
    pub equipment_name: Option<String>,
    pub technician_name: Option<String>,
    pub external_company_name: Option<String>,
}

#[derive(Clone)]
pub struct MaintenanceRepository {
    pool: Pool<Postgres>,
}

impl MaintenanceRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List maintenance records with pagination, most recently scheduled first
    pub async fn list(&self, page: &PageQuery) -> AppResult<(Vec<MaintenanceShort>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM maintenance_records")
            .fetch_one(&self.pool)
            .await?;

        let query = format!("{} ORDER BY m.scheduled_at DESC LIMIT $1 OFFSET $2", SHORT_SELECT);
        let rows = sqlx::query_as::<_, MaintenanceShort>(&query)
            .bind(page.per_page())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<MaintenanceRecord> {
        let mut conn = self.pool.acquire().await?;
        self.load(&mut conn, id).await
    }

    /// Get a maintenance record inside the caller's transaction
    pub async fn load(&self, conn: &mut PgConnection, id: Uuid) -> AppResult<MaintenanceRecord> {
        let row = sqlx::query_as::<_, MaintenanceRow>("SELECT * FROM maintenance_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Maintenance record {} not found", id)))?;
        MaintenanceRecord::try_from(row)
    }

    pub async fn names(&self, record: &MaintenanceRecord) -> AppResult<MaintenanceNames> {
        let names = sqlx::query_as::<_, MaintenanceNames>(
            r#"
            SELECT e.name AS equipment_name,
                   COALESCE(t.name, et.name) AS technician_name,
                   c.legal_name AS external_company_name
            FROM maintenance_records m
            LEFT JOIN equipment e ON e.id = m.equipment_id
            LEFT JOIN technicians t ON t.id = m.technician_id
            LEFT JOIN external_technicians et ON et.id = m.external_technician_id
            LEFT JOIN external_companies c ON c.id = m.external_company_id
            WHERE m.id = $1
            "#,
        )
        .bind(record.id)
        .fetch_optional(&self.pool)
        .await?
        .unwrap_or_default();
        Ok(names)
    }

    /// Insert a new record inside the caller's transaction
    pub async fn insert(&self, conn: &mut PgConnection, record: &MaintenanceRecord) -> AppResult<()> {
        let (technician_id, external_technician_id, external_company_id) =
            record.assignee.to_columns();

        sqlx::query(
            r#"
            INSERT INTO maintenance_records (
                id, equipment_id, maintenance_type, status, priority, description,
                scheduled_at, start_time, end_time, technician_id,
                external_technician_id, external_company_id, labor_cost, parts_cost,
                total_cost, downtime_minutes, notes, replaced_parts, attachment_urls,
                manager_signature_url, technician_signature_url, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                      $15, $16, $17, $18, $19, $20, $21, $22, $23)
            "#,
        )
        .bind(record.id)
        .bind(record.equipment_id)
        .bind(record.maintenance_type)
        .bind(record.status)
        .bind(record.priority)
        .bind(&record.description)
        .bind(record.scheduled_at)
        .bind(record.start_time)
        .bind(record.end_time)
        .bind(technician_id)
        .bind(external_technician_id)
        .bind(external_company_id)
        .bind(record.labor_cost)
        .bind(record.parts_cost)
        .bind(record.total_cost)
        .bind(record.downtime_minutes)
        .bind(&record.notes)
        .bind(&record.replaced_parts)
        .bind(&record.attachment_urls)
        .bind(&record.manager_signature_url)
        .bind(&record.technician_signature_url)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Write every column of an existing record inside the caller's transaction
    pub async fn save(&self, conn: &mut PgConnection, record: &MaintenanceRecord) -> AppResult<()> {
        let (technician_id, external_technician_id, external_company_id) =
            record.assignee.to_columns();

        let result = sqlx::query(
            r#"
            UPDATE maintenance_records SET
                equipment_id = $2, maintenance_type = $3, status = $4, priority = $5,
                description = $6, scheduled_at = $7, start_time = $8, end_time = $9,
                technician_id = $10, external_technician_id = $11, external_company_id = $12,
                labor_cost = $13, parts_cost = $14, total_cost = $15, downtime_minutes = $16,
                notes = $17, replaced_parts = $18, attachment_urls = $19,
                manager_signature_url = $20, technician_signature_url = $21, updated_at = $22
            WHERE id = $1
            "#,
        )
        .bind(record.id)
        .bind(record.equipment_id)
        .bind(record.maintenance_type)
        .bind(record.status)
        .bind(record.priority)
        .bind(&record.description)
        .bind(record.scheduled_at)
        .bind(record.start_time)
        .bind(record.end_time)
        .bind(technician_id)
        .bind(external_technician_id)
        .bind(external_company_id)
        .bind(record.labor_cost)
        .bind(record.parts_cost)
        .bind(record.total_cost)
        .bind(record.downtime_minutes)
        .bind(&record.notes)
        .bind(&record.replaced_parts)
        .bind(&record.attachment_urls)
        .bind(&record.manager_signature_url)
        .bind(&record.technician_signature_url)
        .bind(record.updated_at)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Maintenance record {} not found",
                record.id
            )));
        }
        Ok(())
    }

    /// Delete a record no service order points to
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let linked: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM service_orders WHERE maintenance_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if linked > 0 {
            return Err(AppError::HasDependents(format!(
                "Maintenance record {} is linked to {} service order(s)",
                id, linked
            )));
        }

        let result = sqlx::query("DELETE FROM maintenance_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Maintenance record {} not found", id)));
        }
        Ok(())
    }

    pub async fn exists(&self, id: Uuid) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM maintenance_records WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    pub async fn by_equipment(&self, equipment_id: Uuid) -> AppResult<Vec<MaintenanceShort>> {
        let query = format!("{} WHERE m.equipment_id = $1 ORDER BY m.scheduled_at DESC", SHORT_SELECT);
        let rows = sqlx::query_as::<_, MaintenanceShort>(&query)
            .bind(equipment_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Records assigned to a technician, internal or external
    pub async fn by_technician(&self, technician_id: Uuid) -> AppResult<Vec<MaintenanceShort>> {
        let query = format!(
            "{} WHERE m.technician_id = $1 OR m.external_technician_id = $1 ORDER BY m.scheduled_at DESC",
            SHORT_SELECT
        );
        let rows = sqlx::query_as::<_, MaintenanceShort>(&query)
            .bind(technician_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Records scheduled within [start, end]
    pub async fn by_period(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<MaintenanceShort>> {
        let query = format!(
            "{} WHERE m.scheduled_at >= $1 AND m.scheduled_at <= $2 ORDER BY m.scheduled_at",
            SHORT_SELECT
        );
        let rows = sqlx::query_as::<_, MaintenanceShort>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
