//! Equipment repository

use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::EquipmentStatus,
        equipment::{CreateEquipment, Equipment, EquipmentShort, MaintenanceHistoryEntry, UpdateEquipment},
        page::PageQuery,
    },
};

const SHORT_SELECT: &str = r#"
    SELECT e.id, e.code, e.name, e.model, e.manufacturer, e.serial_number,
           e.status, e.criticality, e.department_id, d.name AS department_name,
           e.next_planned_maintenance
    FROM equipment e
    LEFT JOIN departments d ON d.id = e.department_id
"#;

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List equipment with pagination
    pub async fn list(&self, page: &PageQuery) -> AppResult<(Vec<EquipmentShort>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM equipment")
            .fetch_one(&self.pool)
            .await?;

        let query = format!("{} ORDER BY e.name, e.code LIMIT $1 OFFSET $2", SHORT_SELECT);
        let rows = sqlx::query_as::<_, EquipmentShort>(&query)
            .bind(page.per_page())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    /// Get equipment by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Equipment> {
        let mut conn = self.pool.acquire().await?;
        self.load(&mut conn, id).await
    }

    /// Get equipment by ID inside the caller's transaction
    pub async fn load(&self, conn: &mut PgConnection, id: Uuid) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    pub async fn exists(&self, id: Uuid) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM equipment WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Create equipment
    pub async fn create(
        &self,
        id: Uuid,
        data: &CreateEquipment,
        qr_code: Option<&str>,
    ) -> AppResult<Equipment> {
        let row = sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipment (
                id, code, name, model, manufacturer, serial_number, acquired_on,
                warranty_until, acquisition_value, department_id, location, status,
                criticality, next_planned_maintenance, technical_specs, documentation,
                image_urls, qr_code
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.code)
        .bind(&data.name)
        .bind(&data.model)
        .bind(&data.manufacturer)
        .bind(&data.serial_number)
        .bind(data.acquired_on)
        .bind(data.warranty_until)
        .bind(data.acquisition_value)
        .bind(data.department_id)
        .bind(&data.location)
        .bind(data.status.unwrap_or_default())
        .bind(data.criticality.unwrap_or_default())
        .bind(data.next_planned_maintenance)
        .bind(&data.technical_specs)
        .bind(&data.documentation)
        .bind(&data.image_urls)
        .bind(qr_code)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update equipment; only supplied fields are written
    pub async fn update(
        &self,
        id: Uuid,
        data: &UpdateEquipment,
        qr_code: Option<&str>,
    ) -> AppResult<Equipment> {
        let mut sets = vec!["updated_at = NOW()".to_string()];
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.code, "code");
        add_field!(data.name, "name");
        add_field!(data.model, "model");
        add_field!(data.manufacturer, "manufacturer");
        add_field!(data.serial_number, "serial_number");
        add_field!(data.acquired_on, "acquired_on");
        add_field!(data.warranty_until, "warranty_until");
        add_field!(data.acquisition_value, "acquisition_value");
        add_field!(data.department_id, "department_id");
        add_field!(data.location, "location");
        add_field!(data.status, "status");
        add_field!(data.criticality, "criticality");
        add_field!(data.next_planned_maintenance, "next_planned_maintenance");
        add_field!(data.technical_specs, "technical_specs");
        add_field!(data.documentation, "documentation");
        add_field!(data.image_urls, "image_urls");
        add_field!(qr_code, "qr_code");

        let query = format!(
            "UPDATE equipment SET {} WHERE id = $1 RETURNING *",
            sets.join(", ")
        );

        let mut builder = sqlx::query_as::<_, Equipment>(&query).bind(id);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.code);
        bind_field!(data.name);
        bind_field!(data.model);
        bind_field!(data.manufacturer);
        bind_field!(data.serial_number);
        bind_field!(data.acquired_on);
        bind_field!(data.warranty_until);
        bind_field!(data.acquisition_value);
        bind_field!(data.department_id);
        bind_field!(data.location);
        bind_field!(data.status);
        bind_field!(data.criticality);
        bind_field!(data.next_planned_maintenance);
        bind_field!(data.technical_specs);
        bind_field!(data.documentation);
        bind_field!(data.image_urls);
        bind_field!(qr_code);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Write back the fields the maintenance transition rules may change
    pub async fn save_status(&self, conn: &mut PgConnection, equipment: &Equipment) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE equipment
            SET status = $2, last_maintenance_date = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(equipment.id)
        .bind(equipment.status)
        .bind(equipment.last_maintenance_date)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Store the URL encoded into the equipment QR code
    pub async fn set_qr_code(&self, id: Uuid, url: &str) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>(
            "UPDATE equipment SET qr_code = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(url)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Delete equipment with no maintenance records nor service orders
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let (maintenance, orders): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM maintenance_records WHERE equipment_id = $1),
                (SELECT COUNT(*) FROM service_orders WHERE equipment_id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if maintenance > 0 || orders > 0 {
            return Err(AppError::HasDependents(format!(
                "Equipment {} has {} maintenance record(s) and {} service order(s)",
                id, maintenance, orders
            )));
        }

        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        Ok(())
    }

    /// Maintenance history, most recent first
    pub async fn history(&self, id: Uuid) -> AppResult<Vec<MaintenanceHistoryEntry>> {
        let rows = sqlx::query_as::<_, MaintenanceHistoryEntry>(
            r#"
            SELECT m.id, m.maintenance_type, m.status, m.start_time, m.end_time,
                   COALESCE(t.name, et.name) AS technician_name,
                   m.total_cost, m.downtime_minutes
            FROM maintenance_records m
            LEFT JOIN technicians t ON t.id = m.technician_id
            LEFT JOIN external_technicians et ON et.id = m.external_technician_id
            WHERE m.equipment_id = $1
            ORDER BY m.scheduled_at DESC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn by_department(&self, department_id: Uuid) -> AppResult<Vec<EquipmentShort>> {
        let query = format!("{} WHERE e.department_id = $1 ORDER BY e.name", SHORT_SELECT);
        let rows = sqlx::query_as::<_, EquipmentShort>(&query)
            .bind(department_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn by_status(&self, status: EquipmentStatus) -> AppResult<Vec<EquipmentShort>> {
        let query = format!("{} WHERE e.status = $1 ORDER BY e.name", SHORT_SELECT);
        let rows = sqlx::query_as::<_, EquipmentShort>(&query)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Case-insensitive substring search over the identifying fields
    pub async fn search(&self, term: &str) -> AppResult<Vec<EquipmentShort>> {
        let query = format!(
            r#"{} WHERE e.code ILIKE $1 OR e.name ILIKE $1 OR e.model ILIKE $1
                  OR e.manufacturer ILIKE $1 OR e.serial_number ILIKE $1
               ORDER BY e.name"#,
            SHORT_SELECT
        );
        let rows = sqlx::query_as::<_, EquipmentShort>(&query)
            .bind(format!("%{}%", escape_like(term)))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

/// Escape LIKE wildcards so the term matches literally
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("plain"), "plain");
    }
}
