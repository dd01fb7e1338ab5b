//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::enums::Role;
use crate::error::AppError;

/// System user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Argon2 hash
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub job_title: Option<String>,
    pub department_id: Option<Uuid>,
    pub phone: Option<String>,
    pub role: Role,
    pub active: bool,
    pub last_access_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub job_title: Option<String>,
    pub department_id: Option<Uuid>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
}

/// Update user request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
    pub job_title: Option<String>,
    pub department_id: Option<Uuid>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub user: User,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Kind of JWT: short-lived access or long-lived refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    /// User id
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub kind: TokenKind,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    pub fn new(user: &User, kind: TokenKind, now: i64, lifetime_secs: i64) -> Self {
        Self {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            kind,
            exp: now + lifetime_secs,
            iat: now,
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Any authenticated role except VIEWER may modify data
    pub fn require_write(&self) -> Result<(), AppError> {
        if self.role != Role::Viewer {
            Ok(())
        } else {
            Err(AppError::Authorization("Read-only account".to_string()))
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization("Administrator privileges required".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: String::new(),
            job_title: None,
            department_id: None,
            phone: None,
            role,
            active: true,
            last_access_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_token_roundtrip() {
        let u = user(Role::Technician);
        let now = Utc::now().timestamp();
        let claims = UserClaims::new(&u, TokenKind::Refresh, now, 3600);
        let token = claims.create_token("secret").unwrap();
        let parsed = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.sub, u.id);
        assert_eq!(parsed.role, Role::Technician);
        assert_eq!(parsed.kind, TokenKind::Refresh);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let now = Utc::now().timestamp();
        let token = UserClaims::new(&user(Role::Admin), TokenKind::Access, now, 3600)
            .create_token("secret")
            .unwrap();
        assert!(UserClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now().timestamp();
        let token = UserClaims::new(&user(Role::Admin), TokenKind::Access, now - 7200, 3600)
            .create_token("secret")
            .unwrap();
        assert!(UserClaims::from_token(&token, "secret").is_err());
    }

    #[test]
    fn test_role_checks() {
        let now = Utc::now().timestamp();
        let viewer = UserClaims::new(&user(Role::Viewer), TokenKind::Access, now, 60);
        assert!(viewer.require_write().is_err());
        assert!(viewer.require_admin().is_err());

        let manager = UserClaims::new(&user(Role::Manager), TokenKind::Access, now, 60);
        assert!(manager.require_write().is_ok());
        assert!(manager.require_admin().is_err());

        let admin = UserClaims::new(&user(Role::Admin), TokenKind::Access, now, 60);
        assert!(admin.require_admin().is_ok());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let mut u = user(Role::Requester);
        u.password_hash = "$argon2id$...".to_string();
        let json = serde_json::to_value(&u).unwrap();
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_short_password_rejected() {
        let data = CreateUser {
            name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
            password: "12345".to_string(),
            job_title: None,
            department_id: None,
            phone: None,
            role: None,
            active: None,
        };
        assert!(data.validate().is_err());
    }
}
