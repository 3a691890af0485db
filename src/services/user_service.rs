use crate::database::sqlite::SqliteDatabase;
use crate::errors::{AppError, Result};
use crate::models::user::{User, UserResponse, UserRole};
use crate::models::verification::VerificationState;
use crate::utils::crypto::PasswordManager;
use crate::utils::validation::Validator;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct UserService {
    pub db: Arc<SqliteDatabase>,
}

impl UserService {
    pub fn new(db: Arc<SqliteDatabase>) -> Self {
        Self { db }
    }

    /// Public registration. Admin accounts are provisioned through the
    /// console, never through this path.
    pub async fn register_user(
        &self,
        email: &str,
        full_name: &str,
        password: &str,
        role: UserRole,
        phone_number: Option<String>,
        city: Option<String>,
    ) -> Result<User> {
        if role == UserRole::Admin {
            return Err(AppError::ValidationError(
                "Admin accounts cannot be registered through the API".to_string(),
            ));
        }
        self.create_user(email, full_name, password, role, phone_number, city)
            .await
    }

    pub async fn create_admin(&self, email: &str, full_name: &str, password: &str) -> Result<User> {
        let user = self
            .create_user(email, full_name, password, UserRole::Admin, None, None)
            .await?;
        info!(action = "admin_account_created", user_id = %user.id);
        Ok(user)
    }

    async fn create_user(
        &self,
        email: &str,
        full_name: &str,
        password: &str,
        role: UserRole,
        phone_number: Option<String>,
        city: Option<String>,
    ) -> Result<User> {
        let email = email.trim().to_lowercase();
        Validator::validate_email(&email)?;
        Validator::validate_full_name(full_name)?;
        Validator::validate_password(password)?;
        if let Some(phone) = &phone_number {
            Validator::validate_phone(phone)?;
        }
        if let Some(city) = &city {
            Validator::validate_city(city)?;
        }

        if self.db.get_user_by_email(&email).await?.is_some() {
            return Err(AppError::ValidationError(
                "This email is already registered. Try logging in or use a different email."
                    .to_string(),
            ));
        }

        let password_hash = PasswordManager::hash_password(password)?;
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email,
            full_name: full_name.trim().to_string(),
            password_hash,
            role,
            phone_number,
            city,
            is_blocked: false,
            verification: VerificationState::new(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };

        self.db.create_user(&user).await?;
        Ok(user)
    }

    pub async fn get_user(&self, user_id: &Uuid) -> Result<UserResponse> {
        let user = self.db.get_user_by_id(user_id).await?;
        Ok(user.into())
    }

    pub async fn update_profile(
        &self,
        user_id: &Uuid,
        full_name: Option<String>,
        phone_number: Option<String>,
        city: Option<String>,
    ) -> Result<UserResponse> {
        let mut user = self.db.get_user_by_id(user_id).await?;

        if let Some(full_name) = full_name {
            Validator::validate_full_name(&full_name)?;
            user.full_name = full_name.trim().to_string();
        }
        if let Some(phone) = phone_number {
            Validator::validate_phone(&phone)?;
            user.phone_number = Some(phone);
        }
        if let Some(city) = city {
            Validator::validate_city(&city)?;
            user.city = Some(city);
        }

        self.db.update_user_profile(&user).await?;
        Ok(user.into())
    }

    /// Soft delete. The record stays for referential integrity; the account
    /// disappears from login and every listing surface.
    pub async fn delete_account(&self, user_id: &Uuid, password: &str) -> Result<()> {
        let user = self.db.get_user_by_id(user_id).await?;
        if !PasswordManager::verify_password(password, &user.password_hash)? {
            return Err(AppError::AuthenticationError(
                "Incorrect password".to_string(),
            ));
        }
        self.db.soft_delete_user(user_id).await?;
        self.db.revoke_all_user_tokens(user_id).await?;
        info!(action = "account_deleted", user_id = %user_id);
        Ok(())
    }

    pub async fn change_user_password(
        &self,
        user_id: &Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let user = self.db.get_user_by_id(user_id).await?;
        if !PasswordManager::verify_password(current_password, &user.password_hash)? {
            return Err(AppError::AuthenticationError(
                "Current password is incorrect".to_string(),
            ));
        }
        if PasswordManager::verify_password(new_password, &user.password_hash)? {
            return Err(AppError::ValidationError(
                "New password must be different from the current password".to_string(),
            ));
        }
        Validator::validate_password(new_password)?;
        let new_hash = PasswordManager::hash_password(new_password)?;
        self.db.update_user_password(user_id, &new_hash).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup() -> UserService {
        let db = Arc::new(SqliteDatabase::new_in_memory().await.unwrap());
        UserService::new(db)
    }

    #[tokio::test]
    async fn register_refuses_admin_role() {
        let service = setup().await;
        let err = service
            .register_user(
                "sneaky@roomgi.test",
                "Sneaky",
                "Passw0rd!",
                UserRole::Admin,
                None,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let service = setup().await;
        service
            .register_user(
                "dup@roomgi.test",
                "First User",
                "Passw0rd!",
                UserRole::Tenant,
                None,
                None,
            )
            .await
            .unwrap();
        let err = service
            .register_user(
                "dup@roomgi.test",
                "Second User",
                "Passw0rd!",
                UserRole::Tenant,
                None,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn change_password_verifies_the_old_one() {
        let service = setup().await;
        let user = service
            .register_user(
                "pw@roomgi.test",
                "Password Changer",
                "Passw0rd!",
                UserRole::Tenant,
                None,
                None,
            )
            .await
            .unwrap();

        let err = service
            .change_user_password(&user.id, "WrongOld1", "NewPassw0rd")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AuthenticationError(_)));

        service
            .change_user_password(&user.id, "Passw0rd!", "NewPassw0rd")
            .await
            .unwrap();
    }
}
