//! Lifeline Connect - donor alert routing service
//!
//! Routes emergency blood requests to nearby donors: a donor directory
//! lookup, Haversine distance and blood-type compatibility annotation, then
//! ordering by distance. Also serves the organ pledge registry, donor
//! profiles and a directory of nearby blood banks and hospitals.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{AlertRouter, distance::{haversine_distance, calculate_bounding_box}};
pub use models::{BloodType, GeoPoint, Urgency, DonorMatch, AlertRoutingRequest, AlertRoutingResponse};
pub use services::AlertService;
