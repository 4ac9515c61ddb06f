// Route exports
pub mod alerts;
pub mod donors;
pub mod errors;
pub mod resources;

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use validator::ValidationErrors;

use crate::models::ErrorResponse;
use crate::services::{AlertService, Geocoder, PostgresClient, Registry, ResourceDirectory};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub alerts: Arc<AlertService>,
    pub geocoder: Arc<Geocoder>,
    pub registry: Arc<Registry>,
    pub resources: Arc<ResourceDirectory>,
    pub postgres: Option<Arc<PostgresClient>>,
    pub default_radius_km: f64,
}

pub use errors::{configure_extractors, JsonError};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_extractors).service(
        web::scope("/api/v1")
            .configure(alerts::configure)
            .configure(resources::configure)
            .configure(donors::configure),
    );
}

pub(crate) fn validation_failed(errors: ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}
