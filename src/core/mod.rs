// Core algorithm exports
pub mod compatibility;
pub mod distance;
pub mod router;

pub use compatibility::{compatible_donor_types, is_compatible};
pub use distance::{haversine_distance, calculate_bounding_box, is_within_bounding_box};
pub use router::{AlertRouter, RoutingResult};
