use crate::errors::{AppError, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Copy)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
struct GeocodeHit {
    lat: String,
    lon: String,
}

/// Forward geocoding client for a Nominatim-shaped API. Listing creation
/// treats a failure here as "no coordinates", never as a fatal error.
pub struct GeocodingService {
    client: reqwest::Client,
    base_url: String,
}

impl GeocodingService {
    pub fn from_env() -> Self {
        let base_url = std::env::var("GEOCODER_API_URL")
            .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string());
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub async fn forward_geocode(&self, address: &str, city: &str) -> Result<Option<GeoPoint>> {
        let query = format!("{}, {}", address, city);
        let hits: Vec<GeocodeHit> = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", query.as_str()), ("format", "json"), ("limit", "1")])
            .header("User-Agent", "roomgi-backend")
            .send()
            .await
            .map_err(|e| AppError::GeocodingError(format!("Geocoding request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| AppError::GeocodingError(format!("Geocoder returned an error: {}", e)))?
            .json()
            .await
            .map_err(|e| AppError::GeocodingError(format!("Invalid geocoder response: {}", e)))?;

        let Some(hit) = hits.first() else {
            return Ok(None);
        };
        let latitude = hit
            .lat
            .parse::<f64>()
            .map_err(|e| AppError::GeocodingError(format!("Invalid latitude: {}", e)))?;
        let longitude = hit
            .lon
            .parse::<f64>()
            .map_err(|e| AppError::GeocodingError(format!("Invalid longitude: {}", e)))?;
        Ok(Some(GeoPoint { latitude, longitude }))
    }
}
