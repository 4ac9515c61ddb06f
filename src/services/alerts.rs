use thiserror::Error;

use crate::core::{compatible_donor_types, AlertRouter};
use crate::models::{AlertRoutingRequest, AlertRoutingResponse, DonorQuery};
use crate::services::directory::{DirectoryError, DonorDirectory};

/// Errors raised while routing an alert
#[derive(Debug, Error)]
pub enum AlertError {
    #[error("Donor lookup failed: {0}")]
    Directory(#[from] DirectoryError),
}

/// Routes emergency blood alerts to nearby donors
///
/// One directory lookup per alert, then distance and compatibility
/// annotation through the [`AlertRouter`].
pub struct AlertService {
    directory: DonorDirectory,
    router: AlertRouter,
}

impl AlertService {
    pub fn new(directory: DonorDirectory, router: AlertRouter) -> Self {
        Self { directory, router }
    }

    pub async fn route_alert(
        &self,
        request: &AlertRoutingRequest,
    ) -> Result<AlertRoutingResponse, AlertError> {
        let query = DonorQuery {
            blood_type: request.blood_type,
            hospital_location: request.hospital_location,
            radius_km: request.radius_km,
            accepted_types: compatible_donor_types(self.router.rule(), request.blood_type),
        };

        let candidates = self.directory.find_nearest(&query).await?;

        tracing::debug!(
            "Directory {} returned {} candidates for {} ({} urgency)",
            self.directory.name(),
            candidates.len(),
            request.blood_type,
            request.urgency
        );

        let result = self.router.route(request, candidates);

        tracing::info!(
            "Routed {} alert for {} to {} donors (from {} candidates)",
            request.urgency,
            request.blood_type,
            result.matches.len(),
            result.total_candidates
        );

        Ok(AlertRoutingResponse {
            donor_matches: result.matches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BloodType, GeoPoint, Urgency};
    use crate::services::directory::MockDonorDirectory;

    #[tokio::test]
    async fn test_route_alert_with_mock_directory() {
        let service = AlertService::new(
            DonorDirectory::Mock(MockDonorDirectory::new()),
            AlertRouter::default(),
        );

        let request = AlertRoutingRequest {
            blood_type: BloodType::OPositive,
            hospital_location: GeoPoint::new(34.0522, -118.2437),
            urgency: Urgency::Critical,
            radius_km: 10.0,
        };

        let response = service.route_alert(&request).await.unwrap();

        assert_eq!(response.donor_matches.len(), 2);
        for m in &response.donor_matches {
            assert!(m.is_compatible);
            assert!(m.distance_km > 1.0 && m.distance_km < 2.0, "got {}", m.distance_km);
        }
        assert!(response.donor_matches[0].distance_km <= response.donor_matches[1].distance_km);
    }

    #[tokio::test]
    async fn test_route_alert_small_radius_excludes_mock_donors() {
        let service = AlertService::new(
            DonorDirectory::Mock(MockDonorDirectory::new()),
            AlertRouter::default(),
        );

        let request = AlertRoutingRequest {
            blood_type: BloodType::OPositive,
            hospital_location: GeoPoint::new(34.0522, -118.2437),
            urgency: Urgency::Low,
            radius_km: 0.5,
        };

        let response = service.route_alert(&request).await.unwrap();
        assert!(response.donor_matches.is_empty());
    }
}
