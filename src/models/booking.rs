use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(AppError::ValidationError(format!(
                "Unknown booking status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reservation linking a tenant to a property. Plain record; the only
/// rule enforced at construction is a positive stay window.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Booking {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub property_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub monthly_rent: f64,
    pub security_deposit: f64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        tenant_id: Uuid,
        property_id: Uuid,
        check_in: NaiveDate,
        check_out: NaiveDate,
        monthly_rent: f64,
        security_deposit: f64,
    ) -> Result<Self> {
        if check_in >= check_out {
            return Err(AppError::ValidationError(
                "Check-in date must be before check-out date".to_string(),
            ));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            tenant_id,
            property_id,
            check_in,
            check_out,
            monthly_rent,
            security_deposit,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stay_window_must_be_positive() {
        let day = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let err = Booking::new(Uuid::new_v4(), Uuid::new_v4(), day, day, 450.0, 900.0)
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = Booking::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            day,
            day.pred_opt().unwrap(),
            450.0,
            900.0,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn valid_booking_starts_pending() {
        let check_in = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let check_out = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
        let booking =
            Booking::new(Uuid::new_v4(), Uuid::new_v4(), check_in, check_out, 450.0, 900.0)
                .unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
    }
}
