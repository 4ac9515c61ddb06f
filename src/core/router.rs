use crate::models::{AlertRoutingRequest, CompatibilityRule, DonorCandidate, DonorMatch};
use crate::core::compatibility::is_compatible;

/// Result of routing an alert
#[derive(Debug)]
pub struct RoutingResult {
    pub matches: Vec<DonorMatch>,
    pub total_candidates: usize,
}

/// Routes an emergency alert to the closest donors
///
/// # Pipeline Stages
/// 1. Distance and compatibility annotation
/// 2. Radius cut-off
/// 3. Ordering by distance
/// 4. Optional result cap
#[derive(Debug, Clone)]
pub struct AlertRouter {
    rule: CompatibilityRule,
    max_results: Option<usize>,
}

impl AlertRouter {
    pub fn new(rule: CompatibilityRule, max_results: Option<usize>) -> Self {
        Self { rule, max_results }
    }

    pub fn rule(&self) -> CompatibilityRule {
        self.rule
    }

    /// Annotate, filter and sort donor candidates for a request
    ///
    /// Incompatible donors inside the radius are kept with
    /// `is_compatible = false` so callers can still see them.
    pub fn route(
        &self,
        request: &AlertRoutingRequest,
        candidates: Vec<DonorCandidate>,
    ) -> RoutingResult {
        let total_candidates = candidates.len();
        let hospital = request.hospital_location;

        let mut matches: Vec<DonorMatch> = candidates
            .into_iter()
            .map(|donor| {
                let distance_km = hospital.distance_km(&donor.location);
                DonorMatch {
                    is_compatible: is_compatible(self.rule, donor.blood_type, request.blood_type),
                    donor_id: donor.donor_id,
                    blood_type: donor.blood_type,
                    location: donor.location,
                    distance_km,
                }
            })
            .filter(|m| m.distance_km <= request.radius_km)
            .collect();

        matches.sort_by(|a, b| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.donor_id.cmp(&b.donor_id))
        });

        if let Some(max) = self.max_results {
            matches.truncate(max);
        }

        RoutingResult {
            matches,
            total_candidates,
        }
    }
}

impl Default for AlertRouter {
    fn default() -> Self {
        Self::new(CompatibilityRule::Exact, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BloodType, GeoPoint, Urgency};

    fn create_candidate(id: &str, blood_type: BloodType, lat: f64, lon: f64) -> DonorCandidate {
        DonorCandidate {
            donor_id: id.to_string(),
            blood_type,
            location: GeoPoint::new(lat, lon),
        }
    }

    fn create_request(blood_type: BloodType, radius_km: f64) -> AlertRoutingRequest {
        AlertRoutingRequest {
            blood_type,
            hospital_location: GeoPoint::new(34.0522, -118.2437), // Downtown LA
            urgency: Urgency::Critical,
            radius_km,
        }
    }

    #[test]
    fn test_route_sorted_by_distance() {
        let router = AlertRouter::default();
        let request = create_request(BloodType::APositive, 50.0);

        let candidates = vec![
            create_candidate("far", BloodType::APositive, 34.20, -118.2437),
            create_candidate("near", BloodType::APositive, 34.06, -118.2437),
            create_candidate("mid", BloodType::APositive, 34.10, -118.2437),
        ];

        let result = router.route(&request, candidates);

        let ids: Vec<&str> = result.matches.iter().map(|m| m.donor_id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);
        assert_eq!(result.total_candidates, 3);
    }

    #[test]
    fn test_route_drops_donors_outside_radius() {
        let router = AlertRouter::default();
        let request = create_request(BloodType::OPositive, 10.0);

        let candidates = vec![
            create_candidate("inside", BloodType::OPositive, 34.06, -118.25),   // ~1km
            create_candidate("outside", BloodType::OPositive, 34.40, -118.24),  // ~39km
        ];

        let result = router.route(&request, candidates);

        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].donor_id, "inside");
        assert!(result.matches.iter().all(|m| m.distance_km <= 10.0));
    }

    #[test]
    fn test_route_flags_incompatible_donors() {
        let router = AlertRouter::default();
        let request = create_request(BloodType::BNegative, 10.0);

        let candidates = vec![
            create_candidate("same", BloodType::BNegative, 34.06, -118.25),
            create_candidate("other", BloodType::ONegative, 34.05, -118.24),
        ];

        let result = router.route(&request, candidates);

        assert_eq!(result.matches.len(), 2);
        let same = result.matches.iter().find(|m| m.donor_id == "same").unwrap();
        let other = result.matches.iter().find(|m| m.donor_id == "other").unwrap();
        assert!(same.is_compatible);
        assert!(!other.is_compatible);
    }

    #[test]
    fn test_route_abo_rh_rule() {
        let router = AlertRouter::new(CompatibilityRule::AboRh, None);
        let request = create_request(BloodType::BNegative, 10.0);

        let candidates = vec![create_candidate("universal", BloodType::ONegative, 34.05, -118.24)];

        let result = router.route(&request, candidates);
        assert!(result.matches[0].is_compatible);
    }

    #[test]
    fn test_route_respects_max_results() {
        let router = AlertRouter::new(CompatibilityRule::Exact, Some(5));
        let request = create_request(BloodType::APositive, 100.0);

        let candidates: Vec<DonorCandidate> = (0..20)
            .map(|i| create_candidate(&i.to_string(), BloodType::APositive, 34.0522 + i as f64 * 0.001, -118.2437))
            .collect();

        let result = router.route(&request, candidates);

        assert_eq!(result.matches.len(), 5);
        assert_eq!(result.matches[0].donor_id, "0");
    }

    #[test]
    fn test_route_ties_broken_by_donor_id() {
        let router = AlertRouter::default();
        let request = create_request(BloodType::APositive, 10.0);

        let candidates = vec![
            create_candidate("b", BloodType::APositive, 34.06, -118.2437),
            create_candidate("a", BloodType::APositive, 34.06, -118.2437),
        ];

        let result = router.route(&request, candidates);
        assert_eq!(result.matches[0].donor_id, "a");
        assert_eq!(result.matches[1].donor_id, "b");
    }

    #[test]
    fn test_route_empty_candidates() {
        let router = AlertRouter::default();
        let result = router.route(&create_request(BloodType::APositive, 10.0), vec![]);
        assert!(result.matches.is_empty());
        assert_eq!(result.total_candidates, 0);
    }
}
