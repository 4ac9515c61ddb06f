// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BloodType, BoundingBox, CompatibilityRule, DonorCandidate, DonorMatch, DonorProfile,
    DonorQuery, GeoPoint, NearbyResource, OrganPledge, ResourceKind, Urgency,
};
pub use requests::{AlertRoutingRequest, BloodRequestForm, OrganPledgeRequest, ProfileUpdateRequest};
pub use responses::{
    AlertRoutingResponse, BloodRequestResponse, ErrorResponse, HealthResponse, NearbyResponse,
    PledgeResponse,
};
