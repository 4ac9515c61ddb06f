use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{BloodType, GeoPoint, Urgency};

/// Request to route an emergency alert to nearby donors
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AlertRoutingRequest {
    #[serde(alias = "blood_type", rename = "bloodType")]
    pub blood_type: BloodType,
    #[validate(nested)]
    #[serde(alias = "hospital_location", rename = "hospitalLocation")]
    pub hospital_location: GeoPoint,
    pub urgency: Urgency,
    #[validate(range(exclusive_min = 0.0, max = 500.0))]
    #[serde(alias = "radius_km", rename = "radiusKm")]
    pub radius_km: f64,
}

/// Blood request as submitted from the request form
///
/// The hospital is given by name and resolved to coordinates server-side.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BloodRequestForm {
    #[serde(alias = "blood_type", rename = "bloodType")]
    pub blood_type: BloodType,
    #[validate(length(min = 1, max = 200))]
    pub hospital: String,
    pub urgency: Urgency,
}

/// Organ donation pledge
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrganPledgeRequest {
    #[validate(length(min = 1, max = 200))]
    #[serde(alias = "full_name", rename = "fullName")]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[serde(alias = "confirm_pledge", rename = "confirmPledge", default)]
    pub confirm_pledge: bool,
}

/// Partial update of a donor profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProfileUpdateRequest {
    #[validate(length(min = 1, max = 200))]
    #[serde(default)]
    pub name: Option<String>,
    #[serde(alias = "blood_type", rename = "bloodType", default)]
    pub blood_type: Option<BloodType>,
    #[serde(alias = "last_donation", rename = "lastDonation", default)]
    pub last_donation: Option<chrono::NaiveDate>,
    #[validate(range(max = 10_000))]
    #[serde(default)]
    pub donations: Option<u32>,
    #[validate(url)]
    #[serde(alias = "avatar_url", rename = "avatarUrl", default)]
    pub avatar_url: Option<String>,
}
