use crate::database::sqlite::SqliteDatabase;
use crate::errors::Result;
use crate::models::notification::Notification;
use crate::models::report::Report;
use crate::models::verification::{SubjectKind, VerificationState, VerificationStatus};
use std::sync::Arc;
use uuid::Uuid;

pub struct NotificationService {
    db: Arc<SqliteDatabase>,
}

impl NotificationService {
    pub fn new(db: Arc<SqliteDatabase>) -> Self {
        Self { db }
    }

    pub async fn notify(&self, user_id: &Uuid, title: &str, message: &str) -> Result<Notification> {
        let notification = Notification::new(*user_id, title, message);
        self.db.create_notification(&notification).await?;
        Ok(notification)
    }

    /// Tells the subject's owner how their review ended. Called after the
    /// decision has been persisted; a failure here must not undo it.
    pub async fn notify_verification_decision(
        &self,
        user_id: &Uuid,
        subject: SubjectKind,
        state: &VerificationState,
    ) -> Result<()> {
        let (title, message) = match state.status() {
            VerificationStatus::Approved => (
                "Verification approved".to_string(),
                format!("Your {} verification has been approved.", subject),
            ),
            VerificationStatus::Rejected => (
                "Verification rejected".to_string(),
                format!(
                    "Your {} verification was rejected: {}",
                    subject,
                    state.rejection_reason().unwrap_or("no reason recorded")
                ),
            ),
            _ => return Ok(()),
        };
        self.notify(user_id, &title, &message).await?;
        Ok(())
    }

    pub async fn notify_report_closed(&self, report: &Report) -> Result<()> {
        let message = format!(
            "Your report against a {} has been {}.",
            report.target.model().to_lowercase(),
            report.status()
        );
        self.notify(&report.reporter_id, "Report reviewed", &message)
            .await?;
        Ok(())
    }

    pub async fn list_for_user(&self, user_id: &Uuid, limit: Option<i64>) -> Result<Vec<Notification>> {
        self.db.get_user_notifications(user_id, limit).await
    }

    pub async fn mark_read(&self, user_id: &Uuid, notification_id: &Uuid) -> Result<()> {
        self.db.mark_notification_read(user_id, notification_id).await
    }

    pub async fn mark_all_read(&self, user_id: &Uuid) -> Result<()> {
        self.db.mark_all_notifications_read(user_id).await
    }
}
