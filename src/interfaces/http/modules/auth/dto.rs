//! Authentication DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::application::identity::{AuthResult, Registration};
use crate::domain::{User, UserRole};
use crate::shared::validations::validate_not_blank;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

/// Account as exposed over the API; never carries the password hash
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub name: String,
    pub email: String,
    /// `admin` or `editor`
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            name: u.name,
            email: u.email,
            role: u.role.to_string(),
            last_login_at: u.last_login_at,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserDto,
    pub token: String,
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

impl From<AuthResult> for AuthResponse {
    fn from(r: AuthResult) -> Self {
        Self {
            user: r.user.into(),
            token: r.token,
            token_type: r.token_type,
            expires_in: r.expires_in,
        }
    }
}

fn validate_role(value: &str) -> Result<(), ValidationError> {
    value.parse::<UserRole>().map(|_| ()).map_err(|_| {
        let mut error = ValidationError::new("role");
        error.message = Some("must be one of: admin, editor".into());
        error
    })
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 3, max = 20, message = "must be 3-20 characters"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    /// `admin` or `editor` (default)
    #[validate(custom(function = "validate_role"))]
    pub role: Option<String>,
}

impl RegisterRequest {
    pub fn into_registration(self) -> Registration {
        Registration {
            username: self.username.trim().to_string(),
            password: self.password,
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            role: self.role.and_then(|r| r.parse().ok()),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub current_password: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub new_password: String,
}
