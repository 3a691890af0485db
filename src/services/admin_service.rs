use crate::database::sqlite::{PropertyFilter, SqliteDatabase, UserFilter};
use crate::errors::{AppError, Result};
use crate::models::property::PropertyResponse;
use crate::models::user::{UserResponse, UserRole};
use crate::services::jwt::AdminContext;
use crate::services::{page_window, Page};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct PlatformStats {
    pub total_users: i64,
    pub total_properties: i64,
    pub pending_user_verifications: i64,
    pub pending_property_verifications: i64,
    pub open_reports: i64,
}

/// Read-side projections for the admin console, plus the block switch.
/// Blocking is deliberately not part of the report workflow; it is an
/// independent action on the subject.
pub struct AdminService {
    db: Arc<SqliteDatabase>,
}

impl AdminService {
    pub fn new(db: Arc<SqliteDatabase>) -> Self {
        Self { db }
    }

    pub async fn list_users(
        &self,
        _admin: &AdminContext,
        filter: &UserFilter,
        page: u32,
        limit: u32,
    ) -> Result<Page<UserResponse>> {
        let (page, limit, offset) = page_window(page, limit);
        let total = self.db.count_users_filtered(filter).await?;
        let users = self
            .db
            .list_users_filtered(filter, limit as i64, offset)
            .await?;
        Ok(Page::new(
            users.into_iter().map(UserResponse::from).collect(),
            page,
            limit,
            total,
        ))
    }

    pub async fn list_properties(
        &self,
        _admin: &AdminContext,
        filter: &PropertyFilter,
        page: u32,
        limit: u32,
    ) -> Result<Page<PropertyResponse>> {
        let (page, limit, offset) = page_window(page, limit);
        let total = self.db.count_properties_filtered(filter).await?;
        let properties = self
            .db
            .list_properties_filtered(filter, limit as i64, offset)
            .await?;
        Ok(Page::new(
            properties.into_iter().map(PropertyResponse::from).collect(),
            page,
            limit,
            total,
        ))
    }

    pub async fn set_user_blocked(
        &self,
        admin: &AdminContext,
        user_id: &Uuid,
        blocked: bool,
    ) -> Result<UserResponse> {
        let mut user = self.db.get_user_by_id(user_id).await?;
        if user.role == UserRole::Admin {
            return Err(AppError::AuthorizationError(
                "Administrator accounts cannot be blocked".to_string(),
            ));
        }
        self.db.set_user_blocked(user_id, blocked).await?;
        user.is_blocked = blocked;

        info!(
            action = if blocked { "user_blocked" } else { "user_unblocked" },
            admin_id = %admin.admin_id,
            user_id = %user.id
        );
        Ok(user.into())
    }

    pub async fn platform_stats(&self, _admin: &AdminContext) -> Result<PlatformStats> {
        Ok(PlatformStats {
            total_users: self.db.count_users().await?,
            total_properties: self.db.count_properties().await?,
            pending_user_verifications: self.db.count_pending_user_verifications().await?,
            pending_property_verifications: self.db.count_pending_property_verifications().await?,
            open_reports: self.db.count_open_reports().await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::User;
    use crate::models::verification::{
        DocumentKind, SubjectKind, VerificationDocument, VerificationState, VerificationStatus,
    };
    use crate::utils::crypto::PasswordManager;
    use chrono::Utc;

    async fn setup() -> (Arc<SqliteDatabase>, AdminService) {
        let db = Arc::new(SqliteDatabase::new_in_memory().await.unwrap());
        let service = AdminService::new(db.clone());
        (db, service)
    }

    async fn seed_user(db: &SqliteDatabase, name: &str, role: UserRole) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: format!("{}@roomgi.test", Uuid::new_v4()),
            full_name: name.to_string(),
            password_hash: PasswordManager::hash_password("Passw0rd!").unwrap(),
            role,
            phone_number: None,
            city: None,
            is_blocked: false,
            verification: VerificationState::new(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };
        db.create_user(&user).await.unwrap();
        user
    }

    async fn admin(db: &SqliteDatabase) -> AdminContext {
        let user = seed_user(db, "The Admin", UserRole::Admin).await;
        AdminContext::for_user(&user).unwrap()
    }

    #[tokio::test]
    async fn user_listing_paginates_and_counts() {
        let (db, service) = setup().await;
        let admin_ctx = admin(&db).await;
        for i in 0..5 {
            seed_user(&db, &format!("Tenant {}", i), UserRole::Tenant).await;
        }

        let page = service
            .list_users(
                &admin_ctx,
                &UserFilter {
                    role: Some(UserRole::Tenant),
                    ..Default::default()
                },
                1,
                2,
            )
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_count, 5);
        assert_eq!(page.total_pages, 3);

        let last = service
            .list_users(
                &admin_ctx,
                &UserFilter {
                    role: Some(UserRole::Tenant),
                    ..Default::default()
                },
                3,
                2,
            )
            .await
            .unwrap();
        assert_eq!(last.items.len(), 1);
    }

    #[tokio::test]
    async fn user_listing_filters_by_search_and_verification() {
        let (db, service) = setup().await;
        let admin_ctx = admin(&db).await;
        let alice = seed_user(&db, "Alice Janssens", UserRole::Tenant).await;
        seed_user(&db, "Bob Peeters", UserRole::Tenant).await;

        let mut state = VerificationState::new();
        state
            .submit_documents(
                SubjectKind::User,
                vec![
                    VerificationDocument {
                        kind: DocumentKind::GovernmentId,
                        url: "https://cdn.test/id".to_string(),
                        uploaded_at: Utc::now(),
                    },
                    VerificationDocument {
                        kind: DocumentKind::Selfie,
                        url: "https://cdn.test/selfie".to_string(),
                        uploaded_at: Utc::now(),
                    },
                ],
            )
            .unwrap();
        db.update_user_verification(&alice.id, &state).await.unwrap();

        let by_name = service
            .list_users(
                &admin_ctx,
                &UserFilter {
                    search: Some("alice".to_string()),
                    ..Default::default()
                },
                1,
                20,
            )
            .await
            .unwrap();
        assert_eq!(by_name.total_count, 1);
        assert_eq!(by_name.items[0].id, alice.id);

        let pending = service
            .list_users(
                &admin_ctx,
                &UserFilter {
                    verification_status: Some(VerificationStatus::Pending),
                    ..Default::default()
                },
                1,
                20,
            )
            .await
            .unwrap();
        assert_eq!(pending.total_count, 1);
        assert_eq!(pending.items[0].id, alice.id);
    }

    #[tokio::test]
    async fn block_flag_round_trip() {
        let (db, service) = setup().await;
        let admin_ctx = admin(&db).await;
        let user = seed_user(&db, "Blockable", UserRole::Owner).await;

        let blocked = service
            .set_user_blocked(&admin_ctx, &user.id, true)
            .await
            .unwrap();
        assert!(blocked.is_blocked);
        assert!(db.get_user_by_id(&user.id).await.unwrap().is_blocked);

        let filtered = service
            .list_users(
                &admin_ctx,
                &UserFilter {
                    blocked: Some(true),
                    ..Default::default()
                },
                1,
                20,
            )
            .await
            .unwrap();
        assert_eq!(filtered.total_count, 1);

        let unblocked = service
            .set_user_blocked(&admin_ctx, &user.id, false)
            .await
            .unwrap();
        assert!(!unblocked.is_blocked);
    }

    #[tokio::test]
    async fn admins_cannot_be_blocked() {
        let (db, service) = setup().await;
        let admin_ctx = admin(&db).await;
        let other_admin = seed_user(&db, "Second Admin", UserRole::Admin).await;

        let err = service
            .set_user_blocked(&admin_ctx, &other_admin.id, true)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AuthorizationError(_)));
    }

    #[tokio::test]
    async fn stats_reflect_pending_work() {
        let (db, service) = setup().await;
        let admin_ctx = admin(&db).await;
        seed_user(&db, "Someone", UserRole::Tenant).await;

        let stats = service.platform_stats(&admin_ctx).await.unwrap();
        assert_eq!(stats.total_users, 2); // admin + tenant
        assert_eq!(stats.total_properties, 0);
        assert_eq!(stats.pending_user_verifications, 0);
        assert_eq!(stats.open_reports, 0);
    }
}
