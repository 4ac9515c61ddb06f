use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use validator::Validate;

use crate::models::GeoPoint;
use crate::services::cache::{CacheError, CacheKey, CacheManager};

/// Errors that can occur while resolving a hospital location
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Geocoding service returned error: {0}")]
    ApiError(String),

    #[error("No location found for {0:?}")]
    NotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Resolves hospital names to coordinates
pub enum Geocoder {
    /// Every query resolves to the same point
    Fixed(GeoPoint),
    Http(HttpGeocoder),
}

impl Geocoder {
    pub async fn locate(&self, query: &str) -> Result<GeoPoint, GeocodeError> {
        match self {
            Geocoder::Fixed(point) => Ok(*point),
            Geocoder::Http(http) => http.locate(query).await,
        }
    }
}

/// One result of a Nominatim-style `/search` call
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

/// Client for a Nominatim-compatible search endpoint
pub struct HttpGeocoder {
    base_url: String,
    client: Client,
    cache: Arc<CacheManager>,
}

impl HttpGeocoder {
    pub fn new(
        base_url: String,
        user_agent: &str,
        timeout: Duration,
        cache: Arc<CacheManager>,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            base_url,
            client,
            cache,
        })
    }

    /// Look up coordinates, consulting the cache first
    pub async fn locate(&self, query: &str) -> Result<GeoPoint, GeocodeError> {
        let cache_key = CacheKey::geocode(query);

        match self.cache.get::<GeoPoint>(&cache_key).await {
            Ok(point) => return Ok(point),
            Err(CacheError::CacheMiss(_)) => {}
            Err(e) => tracing::warn!("Geocode cache read failed for {}: {}", cache_key, e),
        }

        let point = self.fetch(query).await?;

        if let Err(e) = self.cache.set(&cache_key, &point).await {
            tracing::warn!("Failed to cache geocode result: {}", e);
        }

        Ok(point)
    }

    async fn fetch(&self, query: &str) -> Result<GeoPoint, GeocodeError> {
        let url = format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(query)
        );

        tracing::debug!("Geocoding {:?} via {}", query, url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(GeocodeError::ApiError(format!(
                "Failed to geocode: {}",
                response.status()
            )));
        }

        let places: Vec<Place> = response
            .json()
            .await
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

        let place = places
            .first()
            .ok_or_else(|| GeocodeError::NotFound(query.to_string()))?;

        let latitude = place
            .lat
            .parse::<f64>()
            .map_err(|e| GeocodeError::InvalidResponse(format!("bad latitude {:?}: {}", place.lat, e)))?;
        let longitude = place
            .lon
            .parse::<f64>()
            .map_err(|e| GeocodeError::InvalidResponse(format!("bad longitude {:?}: {}", place.lon, e)))?;

        let point = GeoPoint::new(latitude, longitude);
        point
            .validate()
            .map_err(|e| GeocodeError::InvalidResponse(format!("coordinates out of range: {}", e)))?;

        Ok(point)
    }
}
