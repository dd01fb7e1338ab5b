//! Users repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::Role,
        page::PageQuery,
        user::{CreateUser, UpdateUser, User},
    },
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List users with pagination
    pub async fn list(&self, page: &PageQuery) -> AppResult<(Vec<User>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY name LIMIT $1 OFFSET $2")
            .bind(page.per_page())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((users, total))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Get user by email (authentication)
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn exists(&self, id: Uuid) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Check if email already exists
    pub async fn email_exists(&self, email: &str, exclude_id: Option<Uuid>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1) AND ($2::uuid IS NULL OR id != $2))",
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Create a new user with an already hashed password
    pub async fn create(&self, user: &CreateUser, password_hash: &str) -> AppResult<User> {
        let row = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, job_title, department_id, phone, role, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(password_hash)
        .bind(&user.job_title)
        .bind(user.department_id)
        .bind(&user.phone)
        .bind(user.role.unwrap_or(Role::Requester))
        .bind(user.active.unwrap_or(true))
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update user; `password_hash` replaces the stored hash when given
    pub async fn update(
        &self,
        id: Uuid,
        user: &UpdateUser,
        password_hash: Option<String>,
    ) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                job_title = COALESCE($5, job_title),
                department_id = COALESCE($6, department_id),
                phone = COALESCE($7, phone),
                role = COALESCE($8, role),
                active = COALESCE($9, active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(password_hash)
        .bind(&user.job_title)
        .bind(user.department_id)
        .bind(&user.phone)
        .bind(user.role)
        .bind(user.active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    pub async fn touch_last_access(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE users SET last_access_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete a user who has not requested any service order
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let orders: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM service_orders WHERE requester_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if orders > 0 {
            return Err(AppError::HasDependents(format!(
                "User {} requested {} service order(s); deactivate the account instead",
                id, orders
            )));
        }

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        Ok(())
    }
}
