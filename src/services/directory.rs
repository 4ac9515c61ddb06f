use std::sync::Arc;
use thiserror::Error;

use crate::core::distance::calculate_bounding_box;
use crate::models::{DonorCandidate, DonorQuery};
use crate::services::postgres::{PostgresClient, PostgresError};

/// Errors raised while looking up donors
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Donor database error: {0}")]
    Database(#[from] PostgresError),
}

/// Source of donor candidates for alert routing
pub enum DonorDirectory {
    /// Fixed two-donor list placed around the hospital
    Mock(MockDonorDirectory),
    /// `donors` table in PostgreSQL
    Postgres(Arc<PostgresClient>),
}

impl DonorDirectory {
    pub fn name(&self) -> &'static str {
        match self {
            DonorDirectory::Mock(_) => "mock",
            DonorDirectory::Postgres(_) => "postgres",
        }
    }

    /// Find donors near the hospital for a request
    pub async fn find_nearest(&self, query: &DonorQuery) -> Result<Vec<DonorCandidate>, DirectoryError> {
        match self {
            DonorDirectory::Mock(mock) => Ok(mock.find_nearest(query)),
            DonorDirectory::Postgres(postgres) => {
                let bbox = calculate_bounding_box(
                    query.hospital_location.latitude,
                    query.hospital_location.longitude,
                    query.radius_km,
                );
                Ok(postgres.find_donors(&bbox, &query.accepted_types).await?)
            }
        }
    }
}

/// Placeholder directory used until a real donor registry is connected
///
/// Always returns `donor1` and `donor2`, offset by `spread_degrees` on both
/// axes to the north-east and south-west of the hospital, carrying the
/// requested blood type.
#[derive(Debug, Clone)]
pub struct MockDonorDirectory {
    spread_degrees: f64,
}

impl MockDonorDirectory {
    pub fn new() -> Self {
        Self { spread_degrees: 0.01 }
    }

    pub fn find_nearest(&self, query: &DonorQuery) -> Vec<DonorCandidate> {
        let hospital = query.hospital_location;
        let d = self.spread_degrees;

        vec![
            DonorCandidate {
                donor_id: "donor1".to_string(),
                blood_type: query.blood_type,
                location: hospital.offset(d, d),
            },
            DonorCandidate {
                donor_id: "donor2".to_string(),
                blood_type: query.blood_type,
                location: hospital.offset(-d, -d),
            },
        ]
    }
}

impl Default for MockDonorDirectory {
    fn default() -> Self {
        Self::new()
    }
}
