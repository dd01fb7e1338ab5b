//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    lifecycle::Clock,
    models::{
        enums::Role,
        page::PageQuery,
        user::{
            CreateUser, LoginResponse, RefreshResponse, TokenKind, UpdateUser, User, UserClaims,
        },
    },
    repository::Repository,
};

const TOKEN_TYPE: &str = "Bearer";

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
    clock: Arc<dyn Clock>,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            config,
            clock,
        }
    }

    /// Authenticate by email and password, returning an access/refresh token pair
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResponse> {
        let user = match self.repository.users.get_by_email(email).await? {
            Some(user) if self.verify_password(&user, password)? => user,
            _ => {
                tracing::warn!(email = %email, "Rejected login");
                return Err(AppError::Authentication("Invalid email or password".to_string()));
            }
        };

        if !user.active {
            tracing::warn!(user_id = %user.id, "Login attempt on inactive account");
            return Err(AppError::Authorization("Account is inactive".to_string()));
        }

        let access_token = self.issue(&user, TokenKind::Access)?;
        let refresh_token = self.issue(&user, TokenKind::Refresh)?;
        self.repository.users.touch_last_access(user.id).await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(LoginResponse {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: self.config.access_token_expiration_secs,
            user,
        })
    }

    /// Exchange a valid refresh token for a new access token
    pub async fn refresh(&self, claims: &UserClaims) -> AppResult<RefreshResponse> {
        let user = self.repository.users.get_by_id(claims.user_id()).await?;
        if !user.active {
            return Err(AppError::Authorization("Account is inactive".to_string()));
        }

        Ok(RefreshResponse {
            access_token: self.issue(&user, TokenKind::Access)?,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: self.config.access_token_expiration_secs,
        })
    }

    fn issue(&self, user: &User, kind: TokenKind) -> AppResult<String> {
        let lifetime = match kind {
            TokenKind::Access => self.config.access_token_expiration_secs,
            TokenKind::Refresh => self.config.refresh_token_expiration_secs,
        };
        UserClaims::new(user, kind, self.clock.now().timestamp(), lifetime)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Verify password against stored hash
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Create the configured administrator when no user exists yet
    pub async fn ensure_bootstrap_admin(&self) -> AppResult<()> {
        let (Some(email), Some(password)) = (
            self.config.bootstrap_admin_email.as_deref(),
            self.config.bootstrap_admin_password.as_deref(),
        ) else {
            return Ok(());
        };

        if self.repository.users.count().await? > 0 {
            return Ok(());
        }

        let admin = self
            .create_user(CreateUser {
                name: "Administrator".to_string(),
                email: email.to_string(),
                password: password.to_string(),
                job_title: None,
                department_id: None,
                phone: None,
                role: Some(Role::Admin),
                active: Some(true),
            })
            .await?;
        tracing::info!(user_id = %admin.id, "Bootstrap administrator created");
        Ok(())
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    pub async fn list(&self, page: &PageQuery) -> AppResult<(Vec<User>, i64)> {
        self.repository.users.list(page).await
    }

    /// Create a new user
    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        user.validate()?;

        if self.repository.users.email_exists(&user.email, None).await? {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        if let Some(department_id) = user.department_id {
            self.repository.departments.get_by_id(department_id).await?;
        }

        let hash = self.hash_password(&user.password)?;
        self.repository.users.create(&user, &hash).await
    }

    /// Update an existing user
    pub async fn update_user(&self, id: Uuid, user: UpdateUser) -> AppResult<User> {
        user.validate()?;
        self.repository.users.get_by_id(id).await?;

        if let Some(ref email) = user.email {
            if self.repository.users.email_exists(email, Some(id)).await? {
                return Err(AppError::Conflict("Email already registered".to_string()));
            }
        }
        if let Some(department_id) = user.department_id {
            self.repository.departments.get_by_id(department_id).await?;
        }

        let hash = match user.password {
            Some(ref password) => Some(self.hash_password(password)?),
            None => None,
        };

        self.repository.users.update(id, &user, hash).await
    }

    /// Delete a user; administrators cannot delete themselves
    pub async fn delete_user(&self, id: Uuid, current_user: Uuid) -> AppResult<()> {
        if id == current_user {
            return Err(AppError::BadRequest("You cannot delete your own account".to_string()));
        }
        self.repository.users.delete(id).await
    }
}
