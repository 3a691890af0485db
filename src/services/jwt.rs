use crate::errors::{AppError, Result};
use crate::models::user::{User, UserRole};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

pub struct JwtManager {
    secret: String,
}

impl JwtManager {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    pub fn generate_token(&self, user_id: &Uuid, email: &str, role: UserRole) -> Result<String> {
        let now = Utc::now();
        let expiration = now + Duration::hours(24);
        let jti = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: role.as_str().to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            jti,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| AppError::AuthenticationError(format!("Failed to generate token: {}", e)))?;

        Ok(token)
    }

    pub fn validate_token(&self, token: &str) -> Result<TokenData<Claims>> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|e| AppError::AuthenticationError(format!("Invalid token: {}", e)))?;

        Ok(token_data)
    }
}

#[derive(Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub token_id: String,
}

impl TryFrom<Claims> for AuthenticatedUser {
    type Error = AppError;

    fn try_from(claims: Claims) -> Result<Self> {
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|e| AppError::ValidationError(format!("Invalid user ID in token: {}", e)))?;

        Ok(Self {
            user_id,
            email: claims.email,
            role: UserRole::parse(&claims.role)?,
            token_id: claims.jti,
        })
    }
}

/// Proof that the caller is an active admin. Moderation operations take this
/// as an explicit parameter instead of re-checking a role somewhere ambient;
/// the only way to obtain one is through [`AdminContext::for_user`].
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub admin_id: Uuid,
    pub email: String,
}

impl AdminContext {
    pub fn for_user(user: &User) -> Result<Self> {
        if user.role != UserRole::Admin {
            return Err(AppError::AuthorizationError(
                "Administrator privileges are required".to_string(),
            ));
        }
        if user.is_blocked || user.is_deleted {
            return Err(AppError::AuthorizationError(
                "This administrator account is not active".to_string(),
            ));
        }
        Ok(Self {
            admin_id: user.id,
            email: user.email.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::verification::VerificationState;

    fn user_with_role(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            email: "admin@roomgi.test".to_string(),
            full_name: "Admin".to_string(),
            password_hash: String::new(),
            role,
            phone_number: None,
            city: None,
            is_blocked: false,
            verification: VerificationState::new(),
            is_deleted: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn admin_context_requires_admin_role() {
        assert!(AdminContext::for_user(&user_with_role(UserRole::Admin)).is_ok());
        for role in [UserRole::Tenant, UserRole::Owner] {
            let err = AdminContext::for_user(&user_with_role(role)).unwrap_err();
            assert!(matches!(err, AppError::AuthorizationError(_)));
        }
    }

    #[test]
    fn blocked_admin_gets_no_context() {
        let mut user = user_with_role(UserRole::Admin);
        user.is_blocked = true;
        assert!(AdminContext::for_user(&user).is_err());
    }

    #[test]
    fn token_round_trip_preserves_identity() {
        let manager = JwtManager::new("test-secret".to_string());
        let user_id = Uuid::new_v4();
        let token = manager
            .generate_token(&user_id, "t@roomgi.test", UserRole::Tenant)
            .unwrap();
        let data = manager.validate_token(&token).unwrap();
        let authenticated = AuthenticatedUser::try_from(data.claims).unwrap();
        assert_eq!(authenticated.user_id, user_id);
        assert_eq!(authenticated.role, UserRole::Tenant);
    }
}
