//! Departments repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::department::{CreateDepartment, Department, UpdateDepartment},
};

#[derive(Clone)]
pub struct DepartmentsRepository {
    pool: Pool<Postgres>,
}

impl DepartmentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Department>> {
        let rows = sqlx::query_as::<_, Department>("SELECT * FROM departments ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Department> {
        sqlx::query_as::<_, Department>("SELECT * FROM departments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Department {} not found", id)))
    }

    pub async fn exists(&self, id: Uuid) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM departments WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    pub async fn create(&self, data: &CreateDepartment) -> AppResult<Department> {
        let row = sqlx::query_as::<_, Department>(
            r#"
            INSERT INTO departments (id, name, description, manager_id, location)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.manager_id)
        .bind(&data.location)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&self, id: Uuid, data: &UpdateDepartment) -> AppResult<Department> {
        sqlx::query_as::<_, Department>(
            r#"
            UPDATE departments SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                manager_id = COALESCE($4, manager_id),
                location = COALESCE($5, location),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.manager_id)
        .bind(&data.location)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Department {} not found", id)))
    }

    /// Delete a department no equipment or service order refers to
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let (equipment, orders): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM equipment WHERE department_id = $1),
                (SELECT COUNT(*) FROM service_orders WHERE department_id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        ensure_no_dependents(id, equipment, orders)?;

        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Department {} not found", id)));
        }
        Ok(())
    }
}

fn ensure_no_dependents(id: Uuid, equipment: i64, orders: i64) -> AppResult<()> {
    if equipment > 0 || orders > 0 {
        return Err(AppError::HasDependents(format!(
            "Department {} still has {} equipment and {} service order(s)",
            id, equipment, orders
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_with_dependents_is_not_deletable() {
        let id = Uuid::new_v4();
        assert!(ensure_no_dependents(id, 0, 0).is_ok());
        for (equipment, orders) in [(2, 0), (0, 1), (1, 1)] {
            assert!(matches!(
                ensure_no_dependents(id, equipment, orders),
                Err(AppError::HasDependents(_))
            ));
        }
    }
}
