use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::verification::{VerificationState, VerificationStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Apartment,
    Room,
    Pg,
    Hostel,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::Room => "room",
            PropertyType::Pg => "pg",
            PropertyType::Hostel => "hostel",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "apartment" => Ok(PropertyType::Apartment),
            "room" => Ok(PropertyType::Room),
            "pg" => Ok(PropertyType::Pg),
            "hostel" => Ok(PropertyType::Hostel),
            other => Err(AppError::ValidationError(format!(
                "Unknown property type '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An image stored in the external object store. The `public_id` is the
/// handle needed to delete the object again.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PropertyImage {
    pub url: String,
    pub public_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Property {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub property_type: PropertyType,
    pub city: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub monthly_rent: f64,
    pub security_deposit: f64,
    pub bedrooms: i64,
    pub amenities: Vec<String>,
    pub images: Vec<PropertyImage>,
    pub is_active: bool,
    pub verification: VerificationState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    /// Whether the listing may appear in public search results. Visibility
    /// reads the verification status: only approved, active listings show.
    pub fn is_publicly_visible(&self) -> bool {
        self.is_active && self.verification.status() == VerificationStatus::Approved
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PropertyResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub property_type: PropertyType,
    pub city: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub monthly_rent: f64,
    pub security_deposit: f64,
    pub bedrooms: i64,
    pub amenities: Vec<String>,
    pub images: Vec<PropertyImage>,
    pub is_active: bool,
    pub verification_status: VerificationStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Property> for PropertyResponse {
    fn from(property: Property) -> Self {
        PropertyResponse {
            id: property.id,
            owner_id: property.owner_id,
            title: property.title,
            description: property.description,
            property_type: property.property_type,
            city: property.city,
            address: property.address,
            latitude: property.latitude,
            longitude: property.longitude,
            monthly_rent: property.monthly_rent,
            security_deposit: property.security_deposit,
            bedrooms: property.bedrooms,
            amenities: property.amenities,
            images: property.images,
            is_active: property.is_active,
            verification_status: property.verification.status(),
            created_at: property.created_at,
        }
    }
}
