use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// ABO/Rh blood group
///
/// Serialized as its symbol ("AB-"); deserialized through `FromStr`, so any
/// casing and surrounding whitespace is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    pub const ALL: [BloodType; 8] = [
        BloodType::APositive,
        BloodType::ANegative,
        BloodType::BPositive,
        BloodType::BNegative,
        BloodType::AbPositive,
        BloodType::AbNegative,
        BloodType::OPositive,
        BloodType::ONegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
        }
    }

    /// Whether red cells carry the A antigen
    pub fn has_a_antigen(&self) -> bool {
        matches!(
            self,
            BloodType::APositive | BloodType::ANegative | BloodType::AbPositive | BloodType::AbNegative
        )
    }

    /// Whether red cells carry the B antigen
    pub fn has_b_antigen(&self) -> bool {
        matches!(
            self,
            BloodType::BPositive | BloodType::BNegative | BloodType::AbPositive | BloodType::AbNegative
        )
    }

    pub fn is_rh_positive(&self) -> bool {
        matches!(
            self,
            BloodType::APositive | BloodType::BPositive | BloodType::AbPositive | BloodType::OPositive
        )
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBloodTypeError(pub String);

impl fmt::Display for ParseBloodTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown blood type: {:?}", self.0)
    }
}

impl std::error::Error for ParseBloodTypeError {}

impl FromStr for BloodType {
    type Err = ParseBloodTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        BloodType::ALL
            .iter()
            .copied()
            .find(|bt| bt.as_str() == normalized)
            .ok_or_else(|| ParseBloodTypeError(s.to_string()))
    }
}

impl TryFrom<String> for BloodType {
    type Error = ParseBloodTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// How urgently the hospital needs blood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    #[serde(alias = "Critical")]
    Critical,
    #[serde(alias = "High")]
    High,
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "Low")]
    Low,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Urgency::Critical => "critical",
            Urgency::High => "high",
            Urgency::Medium => "medium",
            Urgency::Low => "low",
        };
        f.write_str(s)
    }
}

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct GeoPoint {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Great-circle distance to another point in kilometers
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        crate::core::distance::haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }

    /// Shift by a number of degrees on both axes
    pub fn offset(&self, delta_lat: f64, delta_lon: f64) -> Self {
        Self {
            latitude: self.latitude + delta_lat,
            longitude: self.longitude + delta_lon,
        }
    }
}

/// A donor as returned by a donor directory, before routing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorCandidate {
    #[serde(rename = "donorId")]
    pub donor_id: String,
    #[serde(rename = "bloodType")]
    pub blood_type: BloodType,
    pub location: GeoPoint,
}

/// A routed donor: distance to the hospital plus compatibility flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorMatch {
    #[serde(rename = "donorId")]
    pub donor_id: String,
    #[serde(rename = "bloodType")]
    pub blood_type: BloodType,
    pub location: GeoPoint,
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
    #[serde(rename = "isCompatible")]
    pub is_compatible: bool,
}

/// Geospatial bounding box
///
/// `min_lon > max_lon` means the box wraps across the antimeridian.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn crosses_antimeridian(&self) -> bool {
        self.min_lon > self.max_lon
    }
}

/// Which donor blood types count as compatible with a patient
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityRule {
    /// Donor type must equal the patient type
    #[default]
    Exact,
    /// Red-cell ABO/Rh transfusion compatibility
    AboRh,
}

/// Lookup parameters handed to a donor directory
#[derive(Debug, Clone)]
pub struct DonorQuery {
    pub blood_type: BloodType,
    pub hospital_location: GeoPoint,
    pub radius_km: f64,
    pub accepted_types: Vec<BloodType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    BloodBank,
    Hospital,
}

/// A blood bank or hospital listed in the nearby directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyResource {
    pub name: String,
    pub address: String,
    pub phone: String,
    #[serde(rename = "mapUrl")]
    pub map_url: String,
    pub kind: ResourceKind,
}

/// A registered organ donation pledge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganPledge {
    #[serde(rename = "pledgeId")]
    pub pledge_id: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    #[serde(rename = "pledgedAt")]
    pub pledged_at: chrono::DateTime<chrono::Utc>,
}

/// Donor profile shown on the profile screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorProfile {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub name: String,
    #[serde(rename = "bloodType")]
    pub blood_type: BloodType,
    #[serde(rename = "lastDonation", default)]
    pub last_donation: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub donations: u32,
    #[serde(rename = "avatarUrl", default)]
    pub avatar_url: Option<String>,
}

impl DonorProfile {
    /// Profile used to seed the in-memory registry
    pub fn demo() -> Self {
        Self {
            user_id: "demo".to_string(),
            name: "Alex Doe".to_string(),
            blood_type: BloodType::OPositive,
            last_donation: chrono::NaiveDate::from_ymd_opt(2024, 3, 15),
            donations: 5,
            avatar_url: Some("https://placehold.co/100x100".to_string()),
        }
    }
}
