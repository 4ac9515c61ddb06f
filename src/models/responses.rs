use serde::{Deserialize, Serialize};
use crate::models::domain::{DonorMatch, GeoPoint, NearbyResource, Urgency};

/// Response for the alert routing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRoutingResponse {
    #[serde(rename = "donorMatches")]
    pub donor_matches: Vec<DonorMatch>,
}

/// Response for a blood request submitted by hospital name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloodRequestResponse {
    pub hospital: String,
    #[serde(rename = "hospitalLocation")]
    pub hospital_location: GeoPoint,
    pub urgency: Urgency,
    #[serde(rename = "radiusKm")]
    pub radius_km: f64,
    #[serde(rename = "donorMatches")]
    pub donor_matches: Vec<DonorMatch>,
}

/// Nearby blood banks and hospitals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyResponse {
    #[serde(rename = "bloodBanks")]
    pub blood_banks: Vec<NearbyResource>,
    pub hospitals: Vec<NearbyResource>,
}

/// Organ pledge response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PledgeResponse {
    pub success: bool,
    #[serde(rename = "pledgeId")]
    pub pledge_id: String,
    #[serde(rename = "pledgedAt")]
    pub pledged_at: chrono::DateTime<chrono::Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
