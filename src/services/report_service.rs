use crate::database::sqlite::{ReportFilter, SqliteDatabase};
use crate::errors::{AppError, Result};
use crate::models::report::{Report, ReportReason, ReportStatus, ReportTarget};
use crate::models::user::UserResponse;
use crate::services::jwt::{AdminContext, AuthenticatedUser};
use crate::services::notification_service::NotificationService;
use crate::services::{page_window, Page};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// A report joined with the display metadata the admin console needs.
pub struct ReportDetails {
    pub report: Report,
    pub reporter: Option<UserResponse>,
    pub target_label: Option<String>,
}

/// The report workflow: any authenticated user can flag a user or a
/// listing; an admin closes the loop. Closing a report never touches the
/// target. Blocking is a separate admin action.
pub struct ReportService {
    db: Arc<SqliteDatabase>,
    notifications: NotificationService,
}

impl ReportService {
    pub fn new(db: Arc<SqliteDatabase>) -> Self {
        let notifications = NotificationService::new(db.clone());
        Self { db, notifications }
    }

    pub async fn file_report(
        &self,
        reporter: &AuthenticatedUser,
        target: ReportTarget,
        reason: ReportReason,
        message: &str,
    ) -> Result<Report> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::ValidationError(
                "A report message is required".to_string(),
            ));
        }
        if message.len() > 2000 {
            return Err(AppError::ValidationError(
                "Report message must be less than 2000 characters".to_string(),
            ));
        }

        self.ensure_target_exists(&target).await?;

        let report = Report::new(reporter.user_id, target, reason, message);
        self.db.create_report(&report).await?;

        info!(action = "report_filed", report_id = %report.id, reporter_id = %reporter.user_id, target_model = target.model(), target_id = %target.id());
        Ok(report)
    }

    async fn ensure_target_exists(&self, target: &ReportTarget) -> Result<()> {
        let found = match target {
            ReportTarget::User(id) => self.db.get_user_by_id(id).await.map(|_| ()),
            ReportTarget::Property(id) => self.db.get_property_by_id(id).await.map(|_| ()),
        };
        found.map_err(|e| match e {
            AppError::NotFoundError(_) => AppError::NotFoundError(format!(
                "Reported {} does not exist",
                target.model().to_lowercase()
            )),
            other => other,
        })
    }

    pub async fn update_status(
        &self,
        admin: &AdminContext,
        report_id: &Uuid,
        next: ReportStatus,
    ) -> Result<Report> {
        let mut report = self.db.get_report_by_id(report_id).await?;
        report.transition(next, Utc::now())?;
        self.db.update_report_status(&report).await?;

        if let Err(e) = self.notifications.notify_report_closed(&report).await {
            warn!(action = "report_notification_failed", report_id = %report.id, error = %e);
        }

        info!(action = "report_status_updated", admin_id = %admin.admin_id, report_id = %report.id, status = next.as_str());
        Ok(report)
    }

    pub async fn list_reports(
        &self,
        _admin: &AdminContext,
        filter: &ReportFilter,
        page: u32,
        limit: u32,
    ) -> Result<Page<ReportDetails>> {
        let (page, limit, offset) = page_window(page, limit);
        let total = self.db.count_reports_filtered(filter).await?;
        let reports = self
            .db
            .list_reports_filtered(filter, limit as i64, offset)
            .await?;

        let mut details = Vec::with_capacity(reports.len());
        for report in reports {
            let reporter = self
                .db
                .get_user_by_id(&report.reporter_id)
                .await
                .ok()
                .map(UserResponse::from);
            let target_label = match report.target {
                ReportTarget::User(id) => self
                    .db
                    .get_user_by_id(&id)
                    .await
                    .ok()
                    .map(|u| u.full_name),
                ReportTarget::Property(id) => self
                    .db
                    .get_property_by_id(&id)
                    .await
                    .ok()
                    .map(|p| p.title),
            };
            details.push(ReportDetails {
                report,
                reporter,
                target_label,
            });
        }

        Ok(Page::new(details, page, limit, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::property::{Property, PropertyType};
    use crate::models::user::{User, UserRole};
    use crate::models::verification::VerificationState;
    use crate::utils::crypto::PasswordManager;

    async fn setup() -> (Arc<SqliteDatabase>, ReportService) {
        let db = Arc::new(SqliteDatabase::new_in_memory().await.unwrap());
        let service = ReportService::new(db.clone());
        (db, service)
    }

    async fn seed_user(db: &SqliteDatabase, role: UserRole) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: format!("{}@roomgi.test", Uuid::new_v4()),
            full_name: "Report Tester".to_string(),
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

    async fn seed_property(db: &SqliteDatabase, owner: &User) -> Property {
        let now = Utc::now();
        let property = Property {
            id: Uuid::new_v4(),
            owner_id: owner.id,
            title: "Reported flat".to_string(),
            description: "Two rooms over a bakery.".to_string(),
            property_type: PropertyType::Apartment,
            city: "Ghent".to_string(),
            address: "Veldstraat 1".to_string(),
            latitude: None,
            longitude: None,
            monthly_rent: 700.0,
            security_deposit: 1400.0,
            bedrooms: 2,
            amenities: Vec::new(),
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

    #[tokio::test]
    async fn filing_against_a_missing_user_is_not_found() {
        let (db, service) = setup().await;
        let reporter = seed_user(&db, UserRole::Tenant).await;

        let err = service
            .file_report(
                &caller(&reporter),
                ReportTarget::User(Uuid::new_v4()),
                ReportReason::Spam,
                "keeps messaging everyone",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFoundError(_)));
    }

    #[tokio::test]
    async fn filing_needs_a_message() {
        let (db, service) = setup().await;
        let reporter = seed_user(&db, UserRole::Tenant).await;
        let target = seed_user(&db, UserRole::Owner).await;

        let err = service
            .file_report(
                &caller(&reporter),
                ReportTarget::User(target.id),
                ReportReason::Other,
                "   ",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn valid_report_starts_pending() {
        let (db, service) = setup().await;
        let reporter = seed_user(&db, UserRole::Tenant).await;
        let owner = seed_user(&db, UserRole::Owner).await;
        let property = seed_property(&db, &owner).await;

        let report = service
            .file_report(
                &caller(&reporter),
                ReportTarget::Property(property.id),
                ReportReason::Fraud,
                "asks for a deposit before any viewing",
            )
            .await
            .unwrap();
        assert_eq!(report.status(), ReportStatus::Pending);

        let stored = db.get_report_by_id(&report.id).await.unwrap();
        assert_eq!(stored.status(), ReportStatus::Pending);
        assert_eq!(stored.target, ReportTarget::Property(property.id));
    }

    #[tokio::test]
    async fn duplicate_reports_from_the_same_reporter_are_allowed() {
        let (db, service) = setup().await;
        let reporter = seed_user(&db, UserRole::Tenant).await;
        let target = seed_user(&db, UserRole::Owner).await;
        let who = caller(&reporter);

        for _ in 0..2 {
            service
                .file_report(
                    &who,
                    ReportTarget::User(target.id),
                    ReportReason::Harassment,
                    "threatening messages after I declined",
                )
                .await
                .unwrap();
        }

        let total = db
            .count_reports_filtered(&ReportFilter::default())
            .await
            .unwrap();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn dismissal_is_terminal() {
        let (db, service) = setup().await;
        let admin_ctx = admin(&db).await;
        let reporter = seed_user(&db, UserRole::Tenant).await;
        let target = seed_user(&db, UserRole::Owner).await;

        let report = service
            .file_report(
                &caller(&reporter),
                ReportTarget::User(target.id),
                ReportReason::Spam,
                "spam listings",
            )
            .await
            .unwrap();

        let closed = service
            .update_status(&admin_ctx, &report.id, ReportStatus::Dismissed)
            .await
            .unwrap();
        assert_eq!(closed.status(), ReportStatus::Dismissed);
        assert!(closed.resolved_at().is_some());

        let err = service
            .update_status(&admin_ctx, &report.id, ReportStatus::Resolved)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        // The reporter heard about the outcome exactly once.
        let notifications = db.get_user_notifications(&reporter.id, None).await.unwrap();
        assert_eq!(notifications.len(), 1);
    }

    #[tokio::test]
    async fn listing_filters_by_status_and_target_model() {
        let (db, service) = setup().await;
        let admin_ctx = admin(&db).await;
        let reporter = seed_user(&db, UserRole::Tenant).await;
        let target_user = seed_user(&db, UserRole::Owner).await;
        let property = seed_property(&db, &target_user).await;
        let who = caller(&reporter);

        let user_report = service
            .file_report(&who, ReportTarget::User(target_user.id), ReportReason::Spam, "spam")
            .await
            .unwrap();
        service
            .file_report(
                &who,
                ReportTarget::Property(property.id),
                ReportReason::FalseInformation,
                "photos are from another building",
            )
            .await
            .unwrap();
        service
            .update_status(&admin_ctx, &user_report.id, ReportStatus::Resolved)
            .await
            .unwrap();

        let pending = service
            .list_reports(
                &admin_ctx,
                &ReportFilter {
                    status: Some(ReportStatus::Pending),
                    ..Default::default()
                },
                1,
                20,
            )
            .await
            .unwrap();
        assert_eq!(pending.total_count, 1);
        assert_eq!(pending.items[0].report.target, ReportTarget::Property(property.id));
        assert_eq!(pending.items[0].target_label.as_deref(), Some("Reported flat"));
        assert_eq!(
            pending.items[0].reporter.as_ref().map(|r| r.id),
            Some(reporter.id)
        );

        let user_reports = service
            .list_reports(
                &admin_ctx,
                &ReportFilter {
                    target_model: Some("User".to_string()),
                    ..Default::default()
                },
                1,
                20,
            )
            .await
            .unwrap();
        assert_eq!(user_reports.total_count, 1);
    }
}
