use crate::database::sqlite::{PropertySearch, SqliteDatabase};
use crate::errors::{AppError, Result};
use crate::models::property::{Property, PropertyImage, PropertyType};
use crate::models::user::UserRole;
use crate::models::verification::VerificationState;
use crate::services::geocoding_service::GeocodingService;
use crate::services::jwt::AuthenticatedUser;
use crate::services::storage_service::ObjectStorage;
use crate::services::{page_window, Page};
use crate::utils::validation::Validator;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

const MAX_IMAGES_PER_LISTING: usize = 12;

pub struct NewListing {
    pub title: String,
    pub description: String,
    pub property_type: PropertyType,
    pub city: String,
    pub address: String,
    pub monthly_rent: f64,
    pub security_deposit: f64,
    pub bedrooms: i64,
    pub amenities: Vec<String>,
}

#[derive(Default)]
pub struct ListingUpdate {
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

pub struct ImageUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Listing management for owners plus the public search surface. New
/// listings start unverified and stay out of search until an admin
/// approves the property's ownership documents.
pub struct PropertyService {
    db: Arc<SqliteDatabase>,
    storage: Arc<dyn ObjectStorage>,
    geocoder: Option<GeocodingService>,
}

impl PropertyService {
    pub fn new(
        db: Arc<SqliteDatabase>,
        storage: Arc<dyn ObjectStorage>,
        geocoder: Option<GeocodingService>,
    ) -> Self {
        Self {
            db,
            storage,
            geocoder,
        }
    }

    pub async fn create_listing(
        &self,
        caller: &AuthenticatedUser,
        input: NewListing,
    ) -> Result<Property> {
        if caller.role != UserRole::Owner {
            return Err(AppError::AuthorizationError(
                "Only owner accounts can publish listings".to_string(),
            ));
        }
        Validator::validate_listing_title(&input.title)?;
        Validator::validate_city(&input.city)?;
        Validator::validate_rent(input.monthly_rent)?;
        Validator::validate_deposit(input.security_deposit)?;
        if input.description.trim().is_empty() {
            return Err(AppError::ValidationError(
                "A description is required".to_string(),
            ));
        }
        if input.bedrooms < 0 {
            return Err(AppError::ValidationError(
                "Bedrooms cannot be negative".to_string(),
            ));
        }

        // Best effort; a listing without coordinates is still a listing.
        let (latitude, longitude) = match &self.geocoder {
            Some(geocoder) => match geocoder.forward_geocode(&input.address, &input.city).await {
                Ok(Some(point)) => (Some(point.latitude), Some(point.longitude)),
                Ok(None) => (None, None),
                Err(e) => {
                    warn!(action = "geocode_failed", city = %input.city, error = %e);
                    (None, None)
                }
            },
            None => (None, None),
        };

        let now = Utc::now();
        let property = Property {
            id: Uuid::new_v4(),
            owner_id: caller.user_id,
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            property_type: input.property_type,
            city: input.city.trim().to_string(),
            address: input.address.trim().to_string(),
            latitude,
            longitude,
            monthly_rent: input.monthly_rent,
            security_deposit: input.security_deposit,
            bedrooms: input.bedrooms,
            amenities: input.amenities,
            images: Vec::new(),
            is_active: true,
            verification: VerificationState::new(),
            created_at: now,
            updated_at: now,
        };

        self.db.create_property(&property).await?;
        info!(action = "listing_created", property_id = %property.id, owner_id = %caller.user_id);
        Ok(property)
    }

    async fn owned_property(
        &self,
        caller: &AuthenticatedUser,
        property_id: &Uuid,
    ) -> Result<Property> {
        let property = self.db.get_property_by_id(property_id).await?;
        if property.owner_id != caller.user_id {
            return Err(AppError::AuthorizationError(
                "You do not own this property".to_string(),
            ));
        }
        Ok(property)
    }

    pub async fn update_listing(
        &self,
        caller: &AuthenticatedUser,
        property_id: &Uuid,
        update: ListingUpdate,
    ) -> Result<Property> {
        let mut property = self.owned_property(caller, property_id).await?;

        if let Some(title) = update.title {
            Validator::validate_listing_title(&title)?;
            property.title = title.trim().to_string();
        }
        if let Some(description) = update.description {
            if description.trim().is_empty() {
                return Err(AppError::ValidationError(
                    "A description is required".to_string(),
                ));
            }
            property.description = description.trim().to_string();
        }
        if let Some(city) = update.city {
            Validator::validate_city(&city)?;
            property.city = city.trim().to_string();
        }
        if let Some(address) = update.address {
            property.address = address.trim().to_string();
        }
        if let Some(rent) = update.monthly_rent {
            Validator::validate_rent(rent)?;
            property.monthly_rent = rent;
        }
        if let Some(deposit) = update.security_deposit {
            Validator::validate_deposit(deposit)?;
            property.security_deposit = deposit;
        }
        if let Some(bedrooms) = update.bedrooms {
            if bedrooms < 0 {
                return Err(AppError::ValidationError(
                    "Bedrooms cannot be negative".to_string(),
                ));
            }
            property.bedrooms = bedrooms;
        }
        if let Some(amenities) = update.amenities {
            property.amenities = amenities;
        }
        if let Some(is_active) = update.is_active {
            property.is_active = is_active;
        }

        self.db.update_property(&property).await?;
        Ok(property)
    }

    pub async fn delete_listing(
        &self,
        caller: &AuthenticatedUser,
        property_id: &Uuid,
    ) -> Result<()> {
        let property = self.owned_property(caller, property_id).await?;

        // Fire and forget: a stale object in the store is not worth failing
        // the delete over.
        for image in &property.images {
            if let Err(e) = self.storage.delete(&image.public_id).await {
                warn!(action = "image_delete_failed", public_id = %image.public_id, error = %e);
            }
        }

        self.db.delete_property(&property.id).await?;
        info!(action = "listing_deleted", property_id = %property.id, owner_id = %caller.user_id);
        Ok(())
    }

    pub async fn add_images(
        &self,
        caller: &AuthenticatedUser,
        property_id: &Uuid,
        uploads: Vec<ImageUpload>,
    ) -> Result<Vec<PropertyImage>> {
        let mut property = self.owned_property(caller, property_id).await?;

        if uploads.is_empty() {
            return Err(AppError::ValidationError("No images provided".to_string()));
        }
        if property.images.len() + uploads.len() > MAX_IMAGES_PER_LISTING {
            return Err(AppError::ValidationError(format!(
                "A listing can have at most {} images",
                MAX_IMAGES_PER_LISTING
            )));
        }

        for upload in uploads {
            let stored = self
                .storage
                .upload(&upload.filename, &upload.content_type, upload.bytes)
                .await?;
            property.images.push(PropertyImage {
                url: stored.url,
                public_id: stored.public_id,
            });
        }

        self.db
            .update_property_images(&property.id, &property.images)
            .await?;
        Ok(property.images)
    }

    /// Detail view for the public side. A listing that is not approved and
    /// active simply does not exist out here.
    pub async fn get_visible_listing(&self, property_id: &Uuid) -> Result<Property> {
        let property = self.db.get_property_by_id(property_id).await?;
        if !property.is_publicly_visible() {
            return Err(AppError::NotFoundError("Property not found".to_string()));
        }
        Ok(property)
    }

    pub async fn get_owned_listing(
        &self,
        caller: &AuthenticatedUser,
        property_id: &Uuid,
    ) -> Result<Property> {
        self.owned_property(caller, property_id).await
    }

    pub async fn search(
        &self,
        search: &PropertySearch,
        page: u32,
        limit: u32,
    ) -> Result<Page<Property>> {
        let (page, limit, offset) = page_window(page, limit);
        let total = self.db.count_public_properties(search).await?;
        let items = self
            .db
            .search_public_properties(search, limit as i64, offset)
            .await?;
        Ok(Page::new(items, page, limit, total))
    }

    pub async fn list_own(&self, caller: &AuthenticatedUser) -> Result<Vec<Property>> {
        self.db.list_properties_by_owner(&caller.user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{User, UserRole};
    use crate::models::verification::{
        DocumentKind, ReviewDecision, SubjectKind, VerificationDocument,
    };
    use crate::services::storage_service::testing::MemoryStorage;
    use crate::utils::crypto::PasswordManager;

    async fn setup() -> (Arc<SqliteDatabase>, PropertyService) {
        let db = Arc::new(SqliteDatabase::new_in_memory().await.unwrap());
        let service = PropertyService::new(db.clone(), Arc::new(MemoryStorage::default()), None);
        (db, service)
    }

    async fn seed_user(db: &SqliteDatabase, role: UserRole) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: format!("{}@roomgi.test", Uuid::new_v4()),
            full_name: "Listing Tester".to_string(),
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

    fn caller(user: &User) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
            token_id: "test-token".to_string(),
        }
    }

    fn listing_input(city: &str, rent: f64) -> NewListing {
        NewListing {
            title: "Quiet room near the station".to_string(),
            description: "South-facing room in a shared house.".to_string(),
            property_type: PropertyType::Room,
            city: city.to_string(),
            address: "Stationsstraat 5".to_string(),
            monthly_rent: rent,
            security_deposit: rent * 2.0,
            bedrooms: 1,
            amenities: vec!["wifi".to_string()],
        }
    }

    async fn approve(db: &SqliteDatabase, property: &Property) {
        let mut state = property.verification.clone();
        state
            .submit_documents(
                SubjectKind::Property,
                vec![
                    VerificationDocument {
                        kind: DocumentKind::OwnershipProof,
                        url: "https://cdn.test/deed".to_string(),
                        uploaded_at: Utc::now(),
                    },
                    VerificationDocument {
                        kind: DocumentKind::GovernmentId,
                        url: "https://cdn.test/id".to_string(),
                        uploaded_at: Utc::now(),
                    },
                ],
            )
            .unwrap();
        state.decide(ReviewDecision::Approved, None).unwrap();
        db.update_property_verification(&property.id, &state)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn tenants_cannot_publish_listings() {
        let (db, service) = setup().await;
        let tenant = seed_user(&db, UserRole::Tenant).await;
        let err = service
            .create_listing(&caller(&tenant), listing_input("Leuven", 450.0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AuthorizationError(_)));
    }

    #[tokio::test]
    async fn unapproved_listings_stay_out_of_public_search() {
        let (db, service) = setup().await;
        let owner = seed_user(&db, UserRole::Owner).await;
        let who = caller(&owner);

        let hidden = service
            .create_listing(&who, listing_input("Leuven", 450.0))
            .await
            .unwrap();
        let visible = service
            .create_listing(&who, listing_input("Leuven", 520.0))
            .await
            .unwrap();
        approve(&db, &visible).await;

        let page = service
            .search(&PropertySearch::default(), 1, 20)
            .await
            .unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].id, visible.id);

        // Detail view follows the same visibility rule.
        assert!(service.get_visible_listing(&visible.id).await.is_ok());
        let err = service.get_visible_listing(&hidden.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFoundError(_)));
    }

    #[tokio::test]
    async fn deactivated_listing_disappears_from_search() {
        let (db, service) = setup().await;
        let owner = seed_user(&db, UserRole::Owner).await;
        let who = caller(&owner);
        let listing = service
            .create_listing(&who, listing_input("Ghent", 600.0))
            .await
            .unwrap();
        approve(&db, &listing).await;

        service
            .update_listing(
                &who,
                &listing.id,
                ListingUpdate {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let page = service
            .search(&PropertySearch::default(), 1, 20)
            .await
            .unwrap();
        assert_eq!(page.total_count, 0);
    }

    #[tokio::test]
    async fn search_filters_and_paginates() {
        let (db, service) = setup().await;
        let owner = seed_user(&db, UserRole::Owner).await;
        let who = caller(&owner);

        for (city, rent) in [("Leuven", 400.0), ("Leuven", 500.0), ("Ghent", 450.0)] {
            let listing = service
                .create_listing(&who, listing_input(city, rent))
                .await
                .unwrap();
            approve(&db, &listing).await;
        }

        let leuven = service
            .search(
                &PropertySearch {
                    city: Some("Leuven".to_string()),
                    ..Default::default()
                },
                1,
                20,
            )
            .await
            .unwrap();
        assert_eq!(leuven.total_count, 2);

        let affordable = service
            .search(
                &PropertySearch {
                    max_rent: Some(460.0),
                    ..Default::default()
                },
                1,
                20,
            )
            .await
            .unwrap();
        assert_eq!(affordable.total_count, 2);

        let paged = service
            .search(&PropertySearch::default(), 1, 2)
            .await
            .unwrap();
        assert_eq!(paged.items.len(), 2);
        assert_eq!(paged.total_count, 3);
        assert_eq!(paged.total_pages, 2);
    }

    #[tokio::test]
    async fn only_the_owner_can_update_or_delete() {
        let (db, service) = setup().await;
        let owner = seed_user(&db, UserRole::Owner).await;
        let other = seed_user(&db, UserRole::Owner).await;
        let listing = service
            .create_listing(&caller(&owner), listing_input("Leuven", 450.0))
            .await
            .unwrap();

        let err = service
            .update_listing(&caller(&other), &listing.id, ListingUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AuthorizationError(_)));

        let err = service
            .delete_listing(&caller(&other), &listing.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AuthorizationError(_)));

        service
            .delete_listing(&caller(&owner), &listing.id)
            .await
            .unwrap();
        assert!(db.get_property_by_id(&listing.id).await.is_err());
    }
}
