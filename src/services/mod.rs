// Service exports
pub mod alerts;
pub mod cache;
pub mod directory;
pub mod geocoder;
pub mod postgres;
pub mod registry;
pub mod resources;

pub use alerts::{AlertError, AlertService};
pub use cache::{CacheError, CacheKey, CacheManager};
pub use directory::{DirectoryError, DonorDirectory, MockDonorDirectory};
pub use geocoder::{GeocodeError, Geocoder, HttpGeocoder};
pub use postgres::{PostgresClient, PostgresError};
pub use registry::{MemoryRegistry, Registry, RegistryError};
pub use resources::ResourceDirectory;
