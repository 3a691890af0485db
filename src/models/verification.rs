use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::{AppError, Result};

/// Minimum number of documents any submission must carry.
pub const MIN_DOCUMENTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Unverified,
    Pending,
    Approved,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Unverified => "unverified",
            VerificationStatus::Pending => "pending",
            VerificationStatus::Approved => "approved",
            VerificationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "unverified" => Ok(VerificationStatus::Unverified),
            "pending" => Ok(VerificationStatus::Pending),
            "approved" => Ok(VerificationStatus::Approved),
            "rejected" => Ok(VerificationStatus::Rejected),
            other => Err(AppError::ValidationError(format!(
                "Unknown verification status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectKind {
    User,
    Property,
}

impl SubjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectKind::User => "user",
            SubjectKind::Property => "property",
        }
    }
}

impl std::fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document categories accepted by the review team. Which categories are
/// valid depends on the subject being verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    GovernmentId,
    StudentId,
    Selfie,
    OwnershipProof,
    UtilityBill,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::GovernmentId => "government_id",
            DocumentKind::StudentId => "student_id",
            DocumentKind::Selfie => "selfie",
            DocumentKind::OwnershipProof => "ownership_proof",
            DocumentKind::UtilityBill => "utility_bill",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "government_id" => Ok(DocumentKind::GovernmentId),
            "student_id" => Ok(DocumentKind::StudentId),
            "selfie" => Ok(DocumentKind::Selfie),
            "ownership_proof" => Ok(DocumentKind::OwnershipProof),
            "utility_bill" => Ok(DocumentKind::UtilityBill),
            other => Err(AppError::ValidationError(format!(
                "Unknown document type '{}'",
                other
            ))),
        }
    }

    pub fn allowed_for(&self, subject: SubjectKind) -> bool {
        match subject {
            SubjectKind::User => matches!(
                self,
                DocumentKind::GovernmentId | DocumentKind::StudentId | DocumentKind::Selfie
            ),
            SubjectKind::Property => matches!(
                self,
                DocumentKind::OwnershipProof
                    | DocumentKind::GovernmentId
                    | DocumentKind::UtilityBill
            ),
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerificationDocument {
    pub kind: DocumentKind,
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl ReviewDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewDecision::Approved => "approved",
            ReviewDecision::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "approved" => Ok(ReviewDecision::Approved),
            "rejected" => Ok(ReviewDecision::Rejected),
            other => Err(AppError::ValidationError(format!(
                "Decision must be 'approved' or 'rejected', got '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Review state carried by every verifiable subject. Fields are private:
/// the status, reason and document list only change through
/// [`VerificationState::submit_documents`] and [`VerificationState::decide`],
/// which keep the rejection-reason and minimum-document invariants.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VerificationState {
    status: VerificationStatus,
    rejection_reason: Option<String>,
    documents: Vec<VerificationDocument>,
}

impl VerificationState {
    pub fn new() -> Self {
        Self {
            status: VerificationStatus::Unverified,
            rejection_reason: None,
            documents: Vec::new(),
        }
    }

    /// Rebuild a state from its persisted parts. The store is trusted; no
    /// transition checks run here.
    pub fn from_parts(
        status: VerificationStatus,
        rejection_reason: Option<String>,
        documents: Vec<VerificationDocument>,
    ) -> Self {
        Self {
            status,
            rejection_reason,
            documents,
        }
    }

    pub fn status(&self) -> VerificationStatus {
        self.status
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    pub fn documents(&self) -> &[VerificationDocument] {
        &self.documents
    }

    /// Validates a submission without applying it, so callers can reject a
    /// bad request before paying for document uploads.
    pub fn check_submission(&self, subject: SubjectKind, kinds: &[DocumentKind]) -> Result<()> {
        if self.status == VerificationStatus::Approved {
            return Err(AppError::ValidationError(format!(
                "This {} is already approved; submissions are closed",
                subject
            )));
        }
        if kinds.len() < MIN_DOCUMENTS {
            return Err(AppError::ValidationError(format!(
                "At least {} documents are required",
                MIN_DOCUMENTS
            )));
        }
        if let Some(kind) = kinds.iter().find(|k| !k.allowed_for(subject)) {
            return Err(AppError::ValidationError(format!(
                "Document type '{}' is not accepted for {} verification",
                kind, subject
            )));
        }
        if subject == SubjectKind::Property {
            if !kinds.contains(&DocumentKind::OwnershipProof) {
                return Err(AppError::ValidationError(
                    "Property verification requires an ownership proof document".to_string(),
                ));
            }
            if !kinds.contains(&DocumentKind::GovernmentId) {
                return Err(AppError::ValidationError(
                    "Property verification requires a government ID document".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Replaces the document list and moves the subject to `pending`,
    /// clearing any prior rejection reason. Resubmission after a rejection
    /// is the normal appeal path; resubmission after approval is refused.
    pub fn submit_documents(
        &mut self,
        subject: SubjectKind,
        documents: Vec<VerificationDocument>,
    ) -> Result<()> {
        let kinds: Vec<DocumentKind> = documents.iter().map(|d| d.kind).collect();
        self.check_submission(subject, &kinds)?;
        self.documents = documents;
        self.status = VerificationStatus::Pending;
        self.rejection_reason = None;
        Ok(())
    }

    /// Applies an admin decision. Rejection requires a non-empty reason;
    /// approval clears any reason left over from an earlier rejection.
    pub fn decide(&mut self, decision: ReviewDecision, reason: Option<&str>) -> Result<()> {
        match decision {
            ReviewDecision::Approved => {
                self.status = VerificationStatus::Approved;
                self.rejection_reason = None;
            }
            ReviewDecision::Rejected => {
                let reason = reason
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .ok_or_else(|| {
                        AppError::ValidationError(
                            "A rejection reason is required".to_string(),
                        )
                    })?;
                self.status = VerificationStatus::Rejected;
                self.rejection_reason = Some(reason.to_string());
            }
        }
        Ok(())
    }
}

impl Default for VerificationState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(kind: DocumentKind) -> VerificationDocument {
        VerificationDocument {
            kind,
            url: format!("https://cdn.example.com/{}", kind),
            uploaded_at: Utc::now(),
        }
    }

    #[test]
    fn new_state_is_unverified_with_no_reason() {
        let state = VerificationState::new();
        assert_eq!(state.status(), VerificationStatus::Unverified);
        assert!(state.rejection_reason().is_none());
        assert!(state.documents().is_empty());
    }

    #[test]
    fn single_document_is_rejected_for_both_subjects() {
        let mut state = VerificationState::new();
        for subject in [SubjectKind::User, SubjectKind::Property] {
            let err = state
                .submit_documents(subject, vec![doc(DocumentKind::GovernmentId)])
                .unwrap_err();
            assert!(matches!(err, AppError::ValidationError(_)));
        }
        assert_eq!(state.status(), VerificationStatus::Unverified);
    }

    #[test]
    fn property_submission_requires_mandatory_categories() {
        let mut state = VerificationState::new();
        // Two documents but no ownership proof.
        let err = state
            .submit_documents(
                SubjectKind::Property,
                vec![doc(DocumentKind::GovernmentId), doc(DocumentKind::UtilityBill)],
            )
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        // Two documents but no government ID.
        let err = state
            .submit_documents(
                SubjectKind::Property,
                vec![doc(DocumentKind::OwnershipProof), doc(DocumentKind::UtilityBill)],
            )
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        state
            .submit_documents(
                SubjectKind::Property,
                vec![doc(DocumentKind::OwnershipProof), doc(DocumentKind::GovernmentId)],
            )
            .unwrap();
        assert_eq!(state.status(), VerificationStatus::Pending);
    }

    #[test]
    fn subject_specific_document_kinds_are_enforced() {
        let mut state = VerificationState::new();
        let err = state
            .submit_documents(
                SubjectKind::User,
                vec![doc(DocumentKind::OwnershipProof), doc(DocumentKind::Selfie)],
            )
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn rejection_without_reason_fails() {
        let mut state = VerificationState::new();
        state
            .submit_documents(
                SubjectKind::User,
                vec![doc(DocumentKind::GovernmentId), doc(DocumentKind::Selfie)],
            )
            .unwrap();

        let err = state.decide(ReviewDecision::Rejected, None).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        let err = state.decide(ReviewDecision::Rejected, Some("   ")).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        // Failed decisions leave the state untouched.
        assert_eq!(state.status(), VerificationStatus::Pending);
    }

    #[test]
    fn rejected_iff_reason_present_across_full_lifecycle() {
        let mut state = VerificationState::new();

        // Submit one document: refused.
        assert!(state
            .submit_documents(SubjectKind::User, vec![doc(DocumentKind::GovernmentId)])
            .is_err());

        // Two valid documents: pending.
        state
            .submit_documents(
                SubjectKind::User,
                vec![doc(DocumentKind::GovernmentId), doc(DocumentKind::StudentId)],
            )
            .unwrap();
        assert_eq!(state.status(), VerificationStatus::Pending);

        // Reject with a reason.
        state
            .decide(ReviewDecision::Rejected, Some("blurry ID"))
            .unwrap();
        assert_eq!(state.status(), VerificationStatus::Rejected);
        assert_eq!(state.rejection_reason(), Some("blurry ID"));

        // Resubmission clears the reason and returns to pending.
        state
            .submit_documents(
                SubjectKind::User,
                vec![doc(DocumentKind::GovernmentId), doc(DocumentKind::Selfie)],
            )
            .unwrap();
        assert_eq!(state.status(), VerificationStatus::Pending);
        assert!(state.rejection_reason().is_none());

        // Approval leaves no reason behind.
        state.decide(ReviewDecision::Approved, None).unwrap();
        assert_eq!(state.status(), VerificationStatus::Approved);
        assert!(state.rejection_reason().is_none());
    }

    #[test]
    fn approval_clears_prior_rejection_reason() {
        let mut state = VerificationState::new();
        state
            .submit_documents(
                SubjectKind::User,
                vec![doc(DocumentKind::GovernmentId), doc(DocumentKind::Selfie)],
            )
            .unwrap();
        state
            .decide(ReviewDecision::Rejected, Some("expired card"))
            .unwrap();
        state.decide(ReviewDecision::Approved, None).unwrap();
        assert_eq!(state.status(), VerificationStatus::Approved);
        assert!(state.rejection_reason().is_none());
    }

    #[test]
    fn approved_subject_refuses_resubmission() {
        let mut state = VerificationState::new();
        state
            .submit_documents(
                SubjectKind::User,
                vec![doc(DocumentKind::GovernmentId), doc(DocumentKind::Selfie)],
            )
            .unwrap();
        state.decide(ReviewDecision::Approved, None).unwrap();

        let err = state
            .submit_documents(
                SubjectKind::User,
                vec![doc(DocumentKind::GovernmentId), doc(DocumentKind::Selfie)],
            )
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(state.status(), VerificationStatus::Approved);
    }
}
