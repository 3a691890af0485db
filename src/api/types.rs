use crate::models::booking::Booking;
use crate::models::notification::Notification;
use crate::models::property::{PropertyImage, PropertyResponse};
use crate::models::report::Report;
use crate::models::user::{UserResponse, UserRole};
use crate::models::verification::VerificationState;
use crate::services::admin_service::PlatformStats;
use crate::services::report_service::ReportDetails;
use crate::services::Page;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// ---- request bodies ----

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub full_name: String,
    pub password: String,
    /// "tenant" or "owner"
    pub role: String,
    pub phone_number: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenRequest {
    pub token: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteAccountRequest {
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePropertyRequest {
    pub title: String,
    pub description: String,
    /// "apartment", "room", "pg" or "hostel"
    pub property_type: String,
    pub city: String,
    pub address: String,
    pub monthly_rent: f64,
    pub security_deposit: f64,
    pub bedrooms: i64,
    pub amenities: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePropertyRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub monthly_rent: Option<f64>,
    pub security_deposit: Option<f64>,
    pub bedrooms: Option<i64>,
    pub amenities: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    pub property_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FileReportRequest {
    #[serde(rename = "targetModel")]
    pub target_model: String,
    #[serde(rename = "targetId")]
    pub target_id: Uuid,
    /// "spam", "fraud", "harassment", "false_information" or "other"
    pub reason: String,
    pub message: String,
}

/// Admin decision body: `{status, reason?}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DecisionRequest {
    /// "approved" or "rejected"
    pub status: String,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReportStatusRequest {
    /// "resolved" or "dismissed"
    pub status: String,
}

// ---- query parameters ----

#[derive(Debug, Deserialize, IntoParams)]
pub struct PropertySearchQuery {
    pub city: Option<String>,
    pub property_type: Option<String>,
    pub min_rent: Option<f64>,
    pub max_rent: Option<f64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AdminUserQuery {
    pub search: Option<String>,
    pub role: Option<String>,
    pub verification_status: Option<String>,
    pub blocked: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AdminPropertyQuery {
    pub search: Option<String>,
    pub city: Option<String>,
    pub verification_status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AdminReportQuery {
    /// "User" or "Property"
    pub target_model: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

// ---- response payloads ----

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthData {
    pub token: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionData {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshData {
    pub token: String,
    pub expires_in: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PendingUserView {
    pub user: UserResponse,
    pub verification: VerificationState,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PendingPropertyView {
    pub property: PropertyResponse,
    pub owner: UserResponse,
    pub verification: VerificationState,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportResponse {
    pub id: Uuid,
    pub reporter_id: Uuid,
    #[serde(rename = "targetModel")]
    pub target_model: String,
    #[serde(rename = "targetId")]
    pub target_id: Uuid,
    pub reason: String,
    pub message: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        ReportResponse {
            id: report.id,
            reporter_id: report.reporter_id,
            target_model: report.target.model().to_string(),
            target_id: report.target.id(),
            reason: report.reason.as_str().to_string(),
            message: report.message.clone(),
            status: report.status().as_str().to_string(),
            created_at: report.created_at,
            resolved_at: report.resolved_at(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportView {
    pub report: ReportResponse,
    pub reporter: Option<UserResponse>,
    pub target_label: Option<String>,
}

impl From<ReportDetails> for ReportView {
    fn from(details: ReportDetails) -> Self {
        ReportView {
            report: details.report.into(),
            reporter: details.reporter,
            target_label: details.target_label,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PagedUsers {
    pub items: Vec<UserResponse>,
    pub page: u32,
    pub limit: u32,
    pub total_count: i64,
    pub total_pages: u32,
}

impl From<Page<UserResponse>> for PagedUsers {
    fn from(page: Page<UserResponse>) -> Self {
        PagedUsers {
            items: page.items,
            page: page.page,
            limit: page.limit,
            total_count: page.total_count,
            total_pages: page.total_pages,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PagedProperties {
    pub items: Vec<PropertyResponse>,
    pub page: u32,
    pub limit: u32,
    pub total_count: i64,
    pub total_pages: u32,
}

impl From<Page<PropertyResponse>> for PagedProperties {
    fn from(page: Page<PropertyResponse>) -> Self {
        PagedProperties {
            items: page.items,
            page: page.page,
            limit: page.limit,
            total_count: page.total_count,
            total_pages: page.total_pages,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PagedReports {
    pub items: Vec<ReportView>,
    pub page: u32,
    pub limit: u32,
    pub total_count: i64,
    pub total_pages: u32,
}

impl From<Page<ReportDetails>> for PagedReports {
    fn from(page: Page<ReportDetails>) -> Self {
        PagedReports {
            items: page.items.into_iter().map(ReportView::from).collect(),
            page: page.page,
            limit: page.limit,
            total_count: page.total_count,
            total_pages: page.total_pages,
        }
    }
}

// ---- response envelopes ----
//
// Every endpoint answers `{success, data, message}`.

macro_rules! envelope {
    ($(#[$meta:meta])* $name:ident, $data:ty) => {
        $(#[$meta])*
        #[derive(Debug, Serialize, ToSchema)]
        pub struct $name {
            pub success: bool,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub data: Option<$data>,
            pub message: String,
        }

        impl $name {
            pub fn ok(data: $data, message: impl Into<String>) -> Self {
                Self {
                    success: true,
                    data: Some(data),
                    message: message.into(),
                }
            }

            pub fn err(message: impl Into<String>) -> Self {
                Self {
                    success: false,
                    data: None,
                    message: message.into(),
                }
            }
        }
    };
}

envelope!(AuthEnvelope, AuthData);
envelope!(SessionEnvelope, SessionData);
envelope!(RefreshEnvelope, RefreshData);
envelope!(UserEnvelope, UserResponse);
envelope!(VerificationEnvelope, VerificationState);
envelope!(PendingUsersEnvelope, Vec<PendingUserView>);
envelope!(PendingPropertiesEnvelope, Vec<PendingPropertyView>);
envelope!(PropertyEnvelope, PropertyResponse);
envelope!(PropertiesEnvelope, Vec<PropertyResponse>);
envelope!(PagedPropertiesEnvelope, PagedProperties);
envelope!(ImagesEnvelope, Vec<PropertyImage>);
envelope!(BookingEnvelope, Booking);
envelope!(BookingsEnvelope, Vec<Booking>);
envelope!(ReportEnvelope, ReportResponse);
envelope!(PagedReportsEnvelope, PagedReports);
envelope!(PagedUsersEnvelope, PagedUsers);
envelope!(NotificationsEnvelope, Vec<Notification>);
envelope!(StatsEnvelope, PlatformStats);

/// Envelope for endpoints that only report an outcome.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageEnvelope {
    pub success: bool,
    pub message: String,
}

impl MessageEnvelope {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
