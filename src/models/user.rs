use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::verification::{VerificationState, VerificationStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Tenant,
    Owner,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Tenant => "tenant",
            UserRole::Owner => "owner",
            UserRole::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "tenant" => Ok(UserRole::Tenant),
            "owner" => Ok(UserRole::Owner),
            "admin" => Ok(UserRole::Admin),
            other => Err(AppError::ValidationError(format!(
                "Unknown role '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub role: UserRole,
    pub phone_number: Option<String>,
    pub city: Option<String>,
    pub is_blocked: bool,
    pub verification: VerificationState,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public projection of a user record; never carries the password hash.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub phone_number: Option<String>,
    pub city: Option<String>,
    pub is_blocked: bool,
    pub verification_status: VerificationStatus,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            phone_number: user.phone_number,
            city: user.city,
            is_blocked: user.is_blocked,
            verification_status: user.verification.status(),
            created_at: user.created_at,
        }
    }
}
