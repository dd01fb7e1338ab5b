//! Service orders repository

use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::ServiceOrderStatus,
        page::PageQuery,
        service_order::{ServiceOrder, ServiceOrderShort},
    },
};

const SHORT_SELECT: &str = r#"
    SELECT so.id, so.code, so.equipment_id, e.name AS equipment_name,
           d.name AS department_name, u.name AS requester_name,
           so.service_type, so.priority, so.status, so.opened_at
    FROM service_orders so
    LEFT JOIN equipment e ON e.id = so.equipment_id
    LEFT JOIN departments d ON d.id = so.department_id
    LEFT JOIN users u ON u.id = so.requester_id
"#;

#[derive(Debug, Default, sqlx::FromRow)]
pub struct ServiceOrderNames {
    pub equipment_name: Option<String>,
    pub department_name: Option<String>,
    pub requester_name: Option<String>,
}

#[derive(Clone)]
pub struct ServiceOrdersRepository {
    pool: Pool<Postgres>,
}

impl ServiceOrdersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List service orders with pagination, newest first
    pub async fn list(&self, page: &PageQuery) -> AppResult<(Vec<ServiceOrderShort>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM service_orders")
            .fetch_one(&self.pool)
            .await?;

        let query = format!("{} ORDER BY so.opened_at DESC LIMIT $1 OFFSET $2", SHORT_SELECT);
        let rows = sqlx::query_as::<_, ServiceOrderShort>(&query)
            .bind(page.per_page())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<ServiceOrder> {
        let mut conn = self.pool.acquire().await?;
        self.load(&mut conn, id).await
    }

    /// Get a service order inside the caller's transaction
    pub async fn load(&self, conn: &mut PgConnection, id: Uuid) -> AppResult<ServiceOrder> {
        sqlx::query_as::<_, ServiceOrder>("SELECT * FROM service_orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Service order {} not found", id)))
    }

    pub async fn names(&self, order: &ServiceOrder) -> AppResult<ServiceOrderNames> {
        let names = sqlx::query_as::<_, ServiceOrderNames>(
            r#"
            SELECT e.name AS equipment_name, d.name AS department_name, u.name AS requester_name
            FROM service_orders so
            LEFT JOIN equipment e ON e.id = so.equipment_id
            LEFT JOIN departments d ON d.id = so.department_id
            LEFT JOIN users u ON u.id = so.requester_id
            WHERE so.id = $1
            "#,
        )
        .bind(order.id)
        .fetch_optional(&self.pool)
        .await?
        .unwrap_or_default();
        Ok(names)
    }

    /// Highest code issued so far; longer codes carry larger numbers
    pub async fn last_code(&self, conn: &mut PgConnection) -> AppResult<Option<String>> {
        let code: Option<String> = sqlx::query_scalar(
            "SELECT code FROM service_orders ORDER BY LENGTH(code) DESC, code DESC LIMIT 1",
        )
        .fetch_optional(&mut *conn)
        .await?;
        Ok(code)
    }

    /// Insert a new order inside the caller's transaction
    pub async fn insert(&self, conn: &mut PgConnection, order: &ServiceOrder) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO service_orders (
                id, code, equipment_id, department_id, requester_id, service_type,
                problem_description, priority, status, opened_at, assigned_at, started_at,
                completed_at, maintenance_id, attachment_urls, notes, satisfaction_rating,
                satisfaction_comment, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                      $15, $16, $17, $18, $19, $20)
            "#,
        )
        .bind(order.id)
        .bind(&order.code)
        .bind(order.equipment_id)
        .bind(order.department_id)
        .bind(order.requester_id)
        .bind(order.service_type)
        .bind(&order.problem_description)
        .bind(order.priority)
        .bind(order.status)
        .bind(order.opened_at)
        .bind(order.assigned_at)
        .bind(order.started_at)
        .bind(order.completed_at)
        .bind(order.maintenance_id)
        .bind(&order.attachment_urls)
        .bind(&order.notes)
        .bind(order.satisfaction_rating)
        .bind(&order.satisfaction_comment)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Write every mutable column of an order inside the caller's transaction
    pub async fn save(&self, conn: &mut PgConnection, order: &ServiceOrder) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE service_orders SET
                equipment_id = $2, department_id = $3, requester_id = $4, service_type = $5,
                problem_description = $6, priority = $7, status = $8, assigned_at = $9,
                started_at = $10, completed_at = $11, maintenance_id = $12,
                attachment_urls = $13, notes = $14, satisfaction_rating = $15,
                satisfaction_comment = $16, updated_at = $17
            WHERE id = $1
            "#,
        )
        .bind(order.id)
        .bind(order.equipment_id)
        .bind(order.department_id)
        .bind(order.requester_id)
        .bind(order.service_type)
        .bind(&order.problem_description)
        .bind(order.priority)
        .bind(order.status)
        .bind(order.assigned_at)
        .bind(order.started_at)
        .bind(order.completed_at)
        .bind(order.maintenance_id)
        .bind(&order.attachment_urls)
        .bind(&order.notes)
        .bind(order.satisfaction_rating)
        .bind(&order.satisfaction_comment)
        .bind(order.updated_at)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Service order {} not found", order.id)));
        }
        Ok(())
    }

    /// Delete an order not linked to a maintenance record
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let maintenance_id: Option<Uuid> =
            sqlx::query_scalar("SELECT maintenance_id FROM service_orders WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Service order {} not found", id)))?;
        ensure_unlinked(id, maintenance_id)?;

        let result =
            sqlx::query("DELETE FROM service_orders WHERE id = $1 AND maintenance_id IS NULL")
                .bind(id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::HasDependents(format!(
                "Service order {} is linked to a maintenance record",
                id
            )));
        }
        Ok(())
    }

    pub async fn by_requester(&self, requester_id: Uuid) -> AppResult<Vec<ServiceOrderShort>> {
        self.filtered("so.requester_id = $1", requester_id).await
    }

    pub async fn by_department(&self, department_id: Uuid) -> AppResult<Vec<ServiceOrderShort>> {
        self.filtered("so.department_id = $1", department_id).await
    }

    pub async fn by_equipment(&self, equipment_id: Uuid) -> AppResult<Vec<ServiceOrderShort>> {
        self.filtered("so.equipment_id = $1", equipment_id).await
    }

    pub async fn by_status(&self, status: ServiceOrderStatus) -> AppResult<Vec<ServiceOrderShort>> {
        let query = format!("{} WHERE so.status = $1 ORDER BY so.opened_at DESC", SHORT_SELECT);
        let rows = sqlx::query_as::<_, ServiceOrderShort>(&query)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn filtered(&self, condition: &str, id: Uuid) -> AppResult<Vec<ServiceOrderShort>> {
        let query = format!("{} WHERE {} ORDER BY so.opened_at DESC", SHORT_SELECT, condition);
        let rows = sqlx::query_as::<_, ServiceOrderShort>(&query)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

fn ensure_unlinked(id: Uuid, maintenance_id: Option<Uuid>) -> AppResult<()> {
    match maintenance_id {
        Some(maintenance_id) => Err(AppError::HasDependents(format!(
            "Service order {} is linked to maintenance record {}",
            id, maintenance_id
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_linked_to_maintenance_is_not_deletable() {
        let id = Uuid::new_v4();
        assert!(ensure_unlinked(id, None).is_ok());
        assert!(matches!(
            ensure_unlinked(id, Some(Uuid::new_v4())),
            Err(AppError::HasDependents(_))
        ));
    }
}
