use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::{AppError, Result};

/// The entity a report points at. Modelled as a tagged union so a report
/// can never reference both a user and a property, or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "targetModel", content = "targetId")]
pub enum ReportTarget {
    User(Uuid),
    Property(Uuid),
}

impl ReportTarget {
    pub fn model(&self) -> &'static str {
        match self {
            ReportTarget::User(_) => "User",
            ReportTarget::Property(_) => "Property",
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            ReportTarget::User(id) | ReportTarget::Property(id) => *id,
        }
    }

    pub fn from_parts(model: &str, id: Uuid) -> Result<Self> {
        match model {
            "User" => Ok(ReportTarget::User(id)),
            "Property" => Ok(ReportTarget::Property(id)),
            other => Err(AppError::ValidationError(format!(
                "Target model must be 'User' or 'Property', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportReason {
    Spam,
    Fraud,
    Harassment,
    FalseInformation,
    Other,
}

impl ReportReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportReason::Spam => "spam",
            ReportReason::Fraud => "fraud",
            ReportReason::Harassment => "harassment",
            ReportReason::FalseInformation => "false_information",
            ReportReason::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "spam" => Ok(ReportReason::Spam),
            "fraud" => Ok(ReportReason::Fraud),
            "harassment" => Ok(ReportReason::Harassment),
            "false_information" => Ok(ReportReason::FalseInformation),
            "other" => Ok(ReportReason::Other),
            other => Err(AppError::ValidationError(format!(
                "Unknown report reason '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ReportReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Resolved,
    Dismissed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Dismissed => "dismissed",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "pending" => Ok(ReportStatus::Pending),
            "resolved" => Ok(ReportStatus::Resolved),
            "dismissed" => Ok(ReportStatus::Dismissed),
            other => Err(AppError::ValidationError(format!(
                "Unknown report status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A complaint filed by a user against another user or a listing.
/// Reporter, target, reason and message are fixed at creation; only the
/// status moves, through [`Report::transition`].
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub target: ReportTarget,
    pub reason: ReportReason,
    pub message: String,
    status: ReportStatus,
    pub created_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
}

impl Report {
    pub fn new(reporter_id: Uuid, target: ReportTarget, reason: ReportReason, message: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            reporter_id,
            target,
            reason,
            message: message.to_string(),
            status: ReportStatus::Pending,
            created_at: Utc::now(),
            resolved_at: None,
        }
    }

    pub fn from_parts(
        id: Uuid,
        reporter_id: Uuid,
        target: ReportTarget,
        reason: ReportReason,
        message: String,
        status: ReportStatus,
        created_at: DateTime<Utc>,
        resolved_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            reporter_id,
            target,
            reason,
            message,
            status,
            created_at,
            resolved_at,
        }
    }

    pub fn status(&self) -> ReportStatus {
        self.status
    }

    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }

    /// Closes the report. Only a pending report may move, and only to a
    /// terminal status; a second call on a closed report is an error.
    pub fn transition(&mut self, next: ReportStatus, now: DateTime<Utc>) -> Result<()> {
        if next == ReportStatus::Pending {
            return Err(AppError::ValidationError(
                "A report cannot be moved back to pending".to_string(),
            ));
        }
        if self.status != ReportStatus::Pending {
            return Err(AppError::ValidationError(format!(
                "Report is already {}",
                self.status
            )));
        }
        self.status = next;
        self.resolved_at = Some(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> Report {
        Report::new(
            Uuid::new_v4(),
            ReportTarget::User(Uuid::new_v4()),
            ReportReason::Spam,
            "posts the same listing ten times a day",
        )
    }

    #[test]
    fn new_report_starts_pending() {
        let report = sample_report();
        assert_eq!(report.status(), ReportStatus::Pending);
        assert!(report.resolved_at().is_none());
    }

    #[test]
    fn pending_report_can_be_dismissed_once() {
        let mut report = sample_report();
        report.transition(ReportStatus::Dismissed, Utc::now()).unwrap();
        assert_eq!(report.status(), ReportStatus::Dismissed);
        assert!(report.resolved_at().is_some());

        let err = report
            .transition(ReportStatus::Dismissed, Utc::now())
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(report.status(), ReportStatus::Dismissed);
    }

    #[test]
    fn resolved_report_cannot_be_dismissed() {
        let mut report = sample_report();
        report.transition(ReportStatus::Resolved, Utc::now()).unwrap();
        let err = report
            .transition(ReportStatus::Dismissed, Utc::now())
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn report_cannot_return_to_pending() {
        let mut report = sample_report();
        let err = report
            .transition(ReportStatus::Pending, Utc::now())
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn target_serializes_with_model_and_id() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(ReportTarget::Property(id)).unwrap();
        assert_eq!(json["targetModel"], "Property");
        assert_eq!(json["targetId"], id.to_string());

        let parsed: ReportTarget = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, ReportTarget::Property(id));
    }
}
