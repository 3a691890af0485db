use crate::database::sqlite::SqliteDatabase;
use crate::errors::{AppError, Result};
use crate::models::property::Property;
use crate::models::user::{User, UserResponse};
use crate::models::verification::{
    DocumentKind, ReviewDecision, SubjectKind, VerificationDocument, VerificationState,
};
use crate::services::jwt::{AdminContext, AuthenticatedUser};
use crate::services::notification_service::NotificationService;
use crate::services::storage_service::ObjectStorage;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// A document as received from the HTTP layer, before it reaches the
/// object store.
pub struct DocumentUpload {
    pub kind: DocumentKind,
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Pending listing together with its owner, for admin triage.
pub struct PendingPropertyVerification {
    pub property: Property,
    pub owner: UserResponse,
}

/// The verification workflow: document submission by the subject's owner,
/// decisions by an admin, and the pending queues the admin console reads.
pub struct VerificationService {
    db: Arc<SqliteDatabase>,
    storage: Arc<dyn ObjectStorage>,
    notifications: NotificationService,
}

impl VerificationService {
    pub fn new(db: Arc<SqliteDatabase>, storage: Arc<dyn ObjectStorage>) -> Self {
        let notifications = NotificationService::new(db.clone());
        Self {
            db,
            storage,
            notifications,
        }
    }

    /// Identity documents for the calling user. Validation runs before any
    /// upload so a bad submission never leaves orphaned objects behind.
    pub async fn submit_user_documents(
        &self,
        caller: &AuthenticatedUser,
        uploads: Vec<DocumentUpload>,
    ) -> Result<VerificationState> {
        let mut user = self.db.get_user_by_id(&caller.user_id).await?;

        let kinds: Vec<DocumentKind> = uploads.iter().map(|u| u.kind).collect();
        user.verification.check_submission(SubjectKind::User, &kinds)?;

        let documents = self.store_documents(uploads).await?;
        user.verification
            .submit_documents(SubjectKind::User, documents)?;
        self.db
            .update_user_verification(&user.id, &user.verification)
            .await?;

        info!(action = "identity_documents_submitted", user_id = %user.id, documents = kinds.len());
        Ok(user.verification)
    }

    /// Ownership documents for a listing. Only the listing's owner may
    /// submit.
    pub async fn submit_property_documents(
        &self,
        caller: &AuthenticatedUser,
        property_id: &Uuid,
        uploads: Vec<DocumentUpload>,
    ) -> Result<VerificationState> {
        let mut property = self.db.get_property_by_id(property_id).await?;
        if property.owner_id != caller.user_id {
            return Err(AppError::AuthorizationError(
                "Only the property owner can submit verification documents".to_string(),
            ));
        }

        let kinds: Vec<DocumentKind> = uploads.iter().map(|u| u.kind).collect();
        property
            .verification
            .check_submission(SubjectKind::Property, &kinds)?;

        let documents = self.store_documents(uploads).await?;
        property
            .verification
            .submit_documents(SubjectKind::Property, documents)?;
        self.db
            .update_property_verification(&property.id, &property.verification)
            .await?;

        info!(action = "property_documents_submitted", property_id = %property.id, owner_id = %property.owner_id, documents = kinds.len());
        Ok(property.verification)
    }

    async fn store_documents(
        &self,
        uploads: Vec<DocumentUpload>,
    ) -> Result<Vec<VerificationDocument>> {
        let mut documents = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let stored = self
                .storage
                .upload(&upload.filename, &upload.content_type, upload.bytes)
                .await?;
            documents.push(VerificationDocument {
                kind: upload.kind,
                url: stored.url,
                uploaded_at: Utc::now(),
            });
        }
        Ok(documents)
    }

    pub async fn decide_user(
        &self,
        admin: &AdminContext,
        user_id: &Uuid,
        decision: ReviewDecision,
        reason: Option<&str>,
    ) -> Result<VerificationState> {
        let mut user = self.db.get_user_by_id(user_id).await?;
        user.verification.decide(decision, reason)?;
        self.db
            .update_user_verification(&user.id, &user.verification)
            .await?;

        if let Err(e) = self
            .notifications
            .notify_verification_decision(&user.id, SubjectKind::User, &user.verification)
            .await
        {
            warn!(action = "decision_notification_failed", user_id = %user.id, error = %e);
        }

        info!(action = "user_verification_decided", admin_id = %admin.admin_id, user_id = %user.id, decision = decision.as_str());
        Ok(user.verification)
    }

    pub async fn decide_property(
        &self,
        admin: &AdminContext,
        property_id: &Uuid,
        decision: ReviewDecision,
        reason: Option<&str>,
    ) -> Result<VerificationState> {
        let mut property = self.db.get_property_by_id(property_id).await?;
        property.verification.decide(decision, reason)?;
        self.db
            .update_property_verification(&property.id, &property.verification)
            .await?;

        if let Err(e) = self
            .notifications
            .notify_verification_decision(
                &property.owner_id,
                SubjectKind::Property,
                &property.verification,
            )
            .await
        {
            warn!(action = "decision_notification_failed", property_id = %property.id, error = %e);
        }

        info!(action = "property_verification_decided", admin_id = %admin.admin_id, property_id = %property.id, decision = decision.as_str());
        Ok(property.verification)
    }

    pub async fn list_pending_users(&self, _admin: &AdminContext) -> Result<Vec<User>> {
        self.db.list_pending_user_verifications().await
    }

    pub async fn list_pending_properties(
        &self,
        _admin: &AdminContext,
    ) -> Result<Vec<PendingPropertyVerification>> {
        let properties = self.db.list_pending_property_verifications().await?;
        let mut pending = Vec::with_capacity(properties.len());
        for property in properties {
            match self.db.get_user_by_id(&property.owner_id).await {
                Ok(owner) => pending.push(PendingPropertyVerification {
                    property,
                    owner: owner.into(),
                }),
                Err(e) => {
                    warn!(action = "pending_owner_missing", property_id = %property.id, error = %e);
                }
            }
        }
        Ok(pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;
    use crate::models::verification::VerificationStatus;
    use crate::services::storage_service::testing::MemoryStorage;
    use crate::utils::crypto::PasswordManager;

    async fn setup() -> (Arc<SqliteDatabase>, VerificationService) {
        let db = Arc::new(SqliteDatabase::new_in_memory().await.unwrap());
        let service = VerificationService::new(db.clone(), Arc::new(MemoryStorage::default()));
        (db, service)
    }

    async fn seed_user(db: &SqliteDatabase, role: UserRole) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: format!("{}@roomgi.test", Uuid::new_v4()),
            full_name: "Test User".to_string(),
            password_hash: PasswordManager::hash_password("Passw0rd!").unwrap(),
            role,
            phone_number: None,
            city: Some("Leuven".to_string()),
            is_blocked: false,
            verification: VerificationState::new(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };
        db.create_user(&user).await.unwrap();
        user
    }

    async fn seed_property(db: &SqliteDatabase, owner: &User) -> Property {
        use crate::models::property::PropertyType;
        let now = Utc::now();
        let property = Property {
            id: Uuid::new_v4(),
            owner_id: owner.id,
            title: "Bright student room".to_string(),
            description: "Room close to the law faculty, shared kitchen.".to_string(),
            property_type: PropertyType::Room,
            city: "Leuven".to_string(),
            address: "Naamsestraat 22".to_string(),
            latitude: None,
            longitude: None,
            monthly_rent: 450.0,
            security_deposit: 900.0,
            bedrooms: 1,
            amenities: vec!["wifi".to_string()],
            images: Vec::new(),
            is_active: true,
            verification: VerificationState::new(),
            created_at: now,
            updated_at: now,
        };
        db.create_property(&property).await.unwrap();
        property
    }

    fn caller(user: &User) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
            token_id: "test-token".to_string(),
        }
    }

    async fn admin(db: &SqliteDatabase) -> AdminContext {
        let user = seed_user(db, UserRole::Admin).await;
        AdminContext::for_user(&user).unwrap()
    }

    fn upload(kind: DocumentKind) -> DocumentUpload {
        DocumentUpload {
            kind,
            filename: format!("{}.jpg", kind),
            content_type: "image/jpeg".to_string(),
            bytes: vec![0xFF, 0xD8],
        }
    }

    #[tokio::test]
    async fn single_document_submission_is_refused() {
        let (db, service) = setup().await;
        let user = seed_user(&db, UserRole::Tenant).await;

        let err = service
            .submit_user_documents(&caller(&user), vec![upload(DocumentKind::GovernmentId)])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let stored = db.get_user_by_id(&user.id).await.unwrap();
        assert_eq!(stored.verification.status(), VerificationStatus::Unverified);
    }

    #[tokio::test]
    async fn property_submission_needs_mandatory_categories() {
        let (db, service) = setup().await;
        let owner = seed_user(&db, UserRole::Owner).await;
        let property = seed_property(&db, &owner).await;

        let err = service
            .submit_property_documents(
                &caller(&owner),
                &property.id,
                vec![
                    upload(DocumentKind::GovernmentId),
                    upload(DocumentKind::UtilityBill),
                ],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn only_the_owner_may_submit_property_documents() {
        let (db, service) = setup().await;
        let owner = seed_user(&db, UserRole::Owner).await;
        let stranger = seed_user(&db, UserRole::Owner).await;
        let property = seed_property(&db, &owner).await;

        let err = service
            .submit_property_documents(
                &caller(&stranger),
                &property.id,
                vec![
                    upload(DocumentKind::OwnershipProof),
                    upload(DocumentKind::GovernmentId),
                ],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AuthorizationError(_)));
    }

    #[tokio::test]
    async fn decide_on_missing_subject_is_not_found() {
        let (db, service) = setup().await;
        let admin = admin(&db).await;

        let err = service
            .decide_user(&admin, &Uuid::new_v4(), ReviewDecision::Approved, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFoundError(_)));
    }

    #[tokio::test]
    async fn rejection_requires_a_reason() {
        let (db, service) = setup().await;
        let admin = admin(&db).await;
        let user = seed_user(&db, UserRole::Tenant).await;
        service
            .submit_user_documents(
                &caller(&user),
                vec![upload(DocumentKind::GovernmentId), upload(DocumentKind::Selfie)],
            )
            .await
            .unwrap();

        let err = service
            .decide_user(&admin, &user.id, ReviewDecision::Rejected, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let stored = db.get_user_by_id(&user.id).await.unwrap();
        assert_eq!(stored.verification.status(), VerificationStatus::Pending);
    }

    #[tokio::test]
    async fn full_review_lifecycle() {
        let (db, service) = setup().await;
        let admin = admin(&db).await;
        let user = seed_user(&db, UserRole::Tenant).await;
        let who = caller(&user);

        // Two valid documents move the subject to pending.
        let state = service
            .submit_user_documents(
                &who,
                vec![upload(DocumentKind::GovernmentId), upload(DocumentKind::StudentId)],
            )
            .await
            .unwrap();
        assert_eq!(state.status(), VerificationStatus::Pending);

        // Rejection records the reason.
        let state = service
            .decide_user(&admin, &user.id, ReviewDecision::Rejected, Some("blurry ID"))
            .await
            .unwrap();
        assert_eq!(state.status(), VerificationStatus::Rejected);
        assert_eq!(state.rejection_reason(), Some("blurry ID"));

        // Resubmission clears the reason and goes back to pending.
        let state = service
            .submit_user_documents(
                &who,
                vec![upload(DocumentKind::GovernmentId), upload(DocumentKind::Selfie)],
            )
            .await
            .unwrap();
        assert_eq!(state.status(), VerificationStatus::Pending);
        assert!(state.rejection_reason().is_none());

        // Approval is clean.
        let state = service
            .decide_user(&admin, &user.id, ReviewDecision::Approved, None)
            .await
            .unwrap();
        assert_eq!(state.status(), VerificationStatus::Approved);
        assert!(state.rejection_reason().is_none());

        // And terminal: another submission is refused.
        let err = service
            .submit_user_documents(
                &who,
                vec![upload(DocumentKind::GovernmentId), upload(DocumentKind::Selfie)],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        // The owner was told about both decisions.
        let notifications = db.get_user_notifications(&user.id, None).await.unwrap();
        assert_eq!(notifications.len(), 2);
    }

    #[tokio::test]
    async fn pending_queues_contain_only_pending_subjects() {
        let (db, service) = setup().await;
        let admin_ctx = admin(&db).await;
        let pending_user = seed_user(&db, UserRole::Tenant).await;
        let _idle_user = seed_user(&db, UserRole::Tenant).await;
        service
            .submit_user_documents(
                &caller(&pending_user),
                vec![upload(DocumentKind::GovernmentId), upload(DocumentKind::Selfie)],
            )
            .await
            .unwrap();

        let owner = seed_user(&db, UserRole::Owner).await;
        let property = seed_property(&db, &owner).await;
        service
            .submit_property_documents(
                &caller(&owner),
                &property.id,
                vec![
                    upload(DocumentKind::OwnershipProof),
                    upload(DocumentKind::GovernmentId),
                ],
            )
            .await
            .unwrap();

        let users = service.list_pending_users(&admin_ctx).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, pending_user.id);
        assert_eq!(users[0].verification.documents().len(), 2);

        let properties = service.list_pending_properties(&admin_ctx).await.unwrap();
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].property.id, property.id);
        assert_eq!(properties[0].owner.id, owner.id);

        // Deciding drains the queue.
        service
            .decide_property(&admin_ctx, &property.id, ReviewDecision::Approved, None)
            .await
            .unwrap();
        let properties = service.list_pending_properties(&admin_ctx).await.unwrap();
        assert!(properties.is_empty());
    }

    #[tokio::test]
    async fn admin_can_reopen_an_approved_subject_with_a_new_decision() {
        let (db, service) = setup().await;
        let admin_ctx = admin(&db).await;
        let user = seed_user(&db, UserRole::Tenant).await;
        service
            .submit_user_documents(
                &caller(&user),
                vec![upload(DocumentKind::GovernmentId), upload(DocumentKind::Selfie)],
            )
            .await
            .unwrap();
        service
            .decide_user(&admin_ctx, &user.id, ReviewDecision::Approved, None)
            .await
            .unwrap();

        // Last write wins: a later rejection replaces the approval.
        let state = service
            .decide_user(&admin_ctx, &user.id, ReviewDecision::Rejected, Some("document recalled"))
            .await
            .unwrap();
        assert_eq!(state.status(), VerificationStatus::Rejected);
        assert_eq!(state.rejection_reason(), Some("document recalled"));
    }
}
