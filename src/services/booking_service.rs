use crate::database::sqlite::SqliteDatabase;
use crate::errors::{AppError, Result};
use crate::models::booking::{Booking, BookingStatus};
use crate::services::jwt::AuthenticatedUser;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Reservations. Bookings are plain records: the only rules are a positive
/// stay window, a publicly visible property, and who may flip the status.
pub struct BookingService {
    db: Arc<SqliteDatabase>,
}

impl BookingService {
    pub fn new(db: Arc<SqliteDatabase>) -> Self {
        Self { db }
    }

    pub async fn create_booking(
        &self,
        caller: &AuthenticatedUser,
        property_id: &Uuid,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Booking> {
        let property = self.db.get_property_by_id(property_id).await?;
        if !property.is_publicly_visible() {
            return Err(AppError::ValidationError(
                "This property is not open for booking".to_string(),
            ));
        }
        if property.owner_id == caller.user_id {
            return Err(AppError::ValidationError(
                "You cannot book your own property".to_string(),
            ));
        }

        let booking = Booking::new(
            caller.user_id,
            property.id,
            check_in,
            check_out,
            property.monthly_rent,
            property.security_deposit,
        )?;
        self.db.create_booking(&booking).await?;

        info!(action = "booking_created", booking_id = %booking.id, tenant_id = %caller.user_id, property_id = %property.id);
        Ok(booking)
    }

    pub async fn list_for_tenant(&self, caller: &AuthenticatedUser) -> Result<Vec<Booking>> {
        self.db.list_bookings_by_tenant(&caller.user_id).await
    }

    pub async fn list_for_owner(&self, caller: &AuthenticatedUser) -> Result<Vec<Booking>> {
        self.db.list_bookings_by_owner(&caller.user_id).await
    }

    pub async fn confirm(&self, caller: &AuthenticatedUser, booking_id: &Uuid) -> Result<Booking> {
        let mut booking = self.db.get_booking_by_id(booking_id).await?;
        let property = self.db.get_property_by_id(&booking.property_id).await?;
        if property.owner_id != caller.user_id {
            return Err(AppError::AuthorizationError(
                "Only the property owner can confirm a booking".to_string(),
            ));
        }
        if booking.status != BookingStatus::Pending {
            return Err(AppError::ValidationError(format!(
                "Only a pending booking can be confirmed; this one is {}",
                booking.status
            )));
        }

        booking.status = BookingStatus::Confirmed;
        self.db
            .update_booking_status(&booking.id, BookingStatus::Confirmed)
            .await?;
        info!(action = "booking_confirmed", booking_id = %booking.id, owner_id = %caller.user_id);
        Ok(booking)
    }

    pub async fn cancel(&self, caller: &AuthenticatedUser, booking_id: &Uuid) -> Result<Booking> {
        let mut booking = self.db.get_booking_by_id(booking_id).await?;
        let property = self.db.get_property_by_id(&booking.property_id).await?;

        let is_tenant = booking.tenant_id == caller.user_id;
        let is_owner = property.owner_id == caller.user_id;
        if !is_tenant && !is_owner {
            return Err(AppError::AuthorizationError(
                "Only the tenant or the property owner can cancel a booking".to_string(),
            ));
        }
        if booking.status == BookingStatus::Cancelled {
            return Err(AppError::ValidationError(
                "Booking is already cancelled".to_string(),
            ));
        }

        booking.status = BookingStatus::Cancelled;
        self.db
            .update_booking_status(&booking.id, BookingStatus::Cancelled)
            .await?;
        info!(action = "booking_cancelled", booking_id = %booking.id, by = %caller.user_id);
        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::property::{Property, PropertyType};
    use crate::models::user::{User, UserRole};
    use crate::models::verification::{
        DocumentKind, ReviewDecision, SubjectKind, VerificationDocument, VerificationState,
    };
    use crate::utils::crypto::PasswordManager;
    use chrono::Utc;

    async fn setup() -> (Arc<SqliteDatabase>, BookingService) {
        let db = Arc::new(SqliteDatabase::new_in_memory().await.unwrap());
        let service = BookingService::new(db.clone());
        (db, service)
    }

    async fn seed_user(db: &SqliteDatabase, role: UserRole) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: format!("{}@roomgi.test", Uuid::new_v4()),
            full_name: "Booking Tester".to_string(),
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

    async fn seed_property(db: &SqliteDatabase, owner: &User, approved: bool) -> Property {
        let now = Utc::now();
        let mut verification = VerificationState::new();
        if approved {
            verification
                .submit_documents(
                    SubjectKind::Property,
                    vec![
                        VerificationDocument {
                            kind: DocumentKind::OwnershipProof,
                            url: "https://cdn.test/deed".to_string(),
                            uploaded_at: now,
                        },
                        VerificationDocument {
                            kind: DocumentKind::GovernmentId,
                            url: "https://cdn.test/id".to_string(),
                            uploaded_at: now,
                        },
                    ],
                )
                .unwrap();
            verification.decide(ReviewDecision::Approved, None).unwrap();
        }
        let property = Property {
            id: Uuid::new_v4(),
            owner_id: owner.id,
            title: "Bookable room".to_string(),
            description: "A room you can book.".to_string(),
            property_type: PropertyType::Room,
            city: "Leuven".to_string(),
            address: "Bondgenotenlaan 10".to_string(),
            latitude: None,
            longitude: None,
            monthly_rent: 500.0,
            security_deposit: 1000.0,
            bedrooms: 1,
            amenities: Vec::new(),
            images: Vec::new(),
            is_active: true,
            verification,
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

    fn dates() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
        )
    }

    #[tokio::test]
    async fn booking_takes_rent_and_deposit_from_the_listing() {
        let (db, service) = setup().await;
        let owner = seed_user(&db, UserRole::Owner).await;
        let tenant = seed_user(&db, UserRole::Tenant).await;
        let property = seed_property(&db, &owner, true).await;
        let (check_in, check_out) = dates();

        let booking = service
            .create_booking(&caller(&tenant), &property.id, check_in, check_out)
            .await
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.monthly_rent, 500.0);
        assert_eq!(booking.security_deposit, 1000.0);
    }

    #[tokio::test]
    async fn unverified_property_cannot_be_booked() {
        let (db, service) = setup().await;
        let owner = seed_user(&db, UserRole::Owner).await;
        let tenant = seed_user(&db, UserRole::Tenant).await;
        let property = seed_property(&db, &owner, false).await;
        let (check_in, check_out) = dates();

        let err = service
            .create_booking(&caller(&tenant), &property.id, check_in, check_out)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn owner_cannot_book_own_property() {
        let (db, service) = setup().await;
        let owner = seed_user(&db, UserRole::Owner).await;
        let property = seed_property(&db, &owner, true).await;
        let (check_in, check_out) = dates();

        let err = service
            .create_booking(&caller(&owner), &property.id, check_in, check_out)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn confirm_is_owner_only_and_single_shot() {
        let (db, service) = setup().await;
        let owner = seed_user(&db, UserRole::Owner).await;
        let tenant = seed_user(&db, UserRole::Tenant).await;
        let property = seed_property(&db, &owner, true).await;
        let (check_in, check_out) = dates();
        let booking = service
            .create_booking(&caller(&tenant), &property.id, check_in, check_out)
            .await
            .unwrap();

        let err = service
            .confirm(&caller(&tenant), &booking.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AuthorizationError(_)));

        let confirmed = service.confirm(&caller(&owner), &booking.id).await.unwrap();
        assert_eq!(confirmed.status, BookingStatus::Confirmed);

        let err = service
            .confirm(&caller(&owner), &booking.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn tenant_can_cancel_but_strangers_cannot() {
        let (db, service) = setup().await;
        let owner = seed_user(&db, UserRole::Owner).await;
        let tenant = seed_user(&db, UserRole::Tenant).await;
        let stranger = seed_user(&db, UserRole::Tenant).await;
        let property = seed_property(&db, &owner, true).await;
        let (check_in, check_out) = dates();
        let booking = service
            .create_booking(&caller(&tenant), &property.id, check_in, check_out)
            .await
            .unwrap();

        let err = service
            .cancel(&caller(&stranger), &booking.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AuthorizationError(_)));

        let cancelled = service.cancel(&caller(&tenant), &booking.id).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        let err = service
            .cancel(&caller(&tenant), &booking.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
