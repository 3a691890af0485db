use crate::database::sqlite::SqliteDatabase;
use crate::errors::{AppError, Result};
use crate::models::user::User;
use crate::services::jwt::{AuthenticatedUser, JwtManager};
use crate::utils::crypto::PasswordManager;
use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use std::sync::Arc;

pub struct AuthService {
    jwt_manager: JwtManager,
    database: Arc<SqliteDatabase>,
}

impl AuthService {
    pub fn new(database: Arc<SqliteDatabase>) -> Self {
        let jwt_secret = std::env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set in environment for production!");

        Self {
            jwt_manager: JwtManager::new(jwt_secret),
            database,
        }
    }

    pub async fn authenticate_user(&self, email: &str, password: &str) -> Result<User> {
        let user = self
            .database
            .get_user_by_email(email)
            .await?
            .ok_or_else(|| {
                AppError::AuthenticationError("Invalid email or password".to_string())
            })?;

        if !PasswordManager::verify_password(password, &user.password_hash)? {
            return Err(AppError::AuthenticationError(
                "Invalid email or password".to_string(),
            ));
        }

        if user.is_blocked {
            return Err(AppError::AuthorizationError(
                "This account has been blocked. Contact support.".to_string(),
            ));
        }

        Ok(user)
    }

    pub async fn login_and_generate_token(&self, email: &str, password: &str) -> Result<(String, User)> {
        let user = self.authenticate_user(email, password).await?;
        let token = self.issue_token(&user).await?;
        Ok((token, user))
    }

    async fn issue_token(&self, user: &User) -> Result<String> {
        let token = self
            .jwt_manager
            .generate_token(&user.id, &user.email, user.role)?;

        let token_data = self.jwt_manager.validate_token(&token)?;
        let token_id = &token_data.claims.jti;
        let token_hash = self.hash_token(&token);
        let expires_at = Utc::now() + Duration::hours(24);

        self.database
            .store_user_token(&user.id, token_id, &token_hash, expires_at)
            .await?;
        let _ = self.database.cleanup_expired_tokens().await;

        Ok(token)
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser> {
        let token_data = self.jwt_manager.validate_token(token)?;
        let token_id = &token_data.claims.jti;

        if !self.database.is_token_valid(token_id).await? {
            return Err(AppError::AuthenticationError(
                "Token not found or inactive in database".to_string(),
            ));
        }

        AuthenticatedUser::try_from(token_data.claims)
    }

    pub async fn refresh_token(&self, old_token: &str) -> Result<String> {
        let user = self.validate_token(old_token).await?;
        let record = self.database.get_user_by_id(&user.user_id).await?;

        self.database.revoke_token(&user.token_id).await?;
        self.issue_token(&record).await
    }

    pub async fn logout(&self, token: &str) -> Result<()> {
        let token_data = self.jwt_manager.validate_token(token)?;
        self.database.revoke_token(&token_data.claims.jti).await?;
        Ok(())
    }

    pub async fn logout_all_devices(&self, token: &str) -> Result<()> {
        let user = self.validate_token(token).await?;
        self.database.revoke_all_user_tokens(&user.user_id).await?;
        Ok(())
    }

    fn hash_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
