use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{
    AlertRoutingRequest, BloodRequestForm, BloodRequestResponse, ErrorResponse, HealthResponse,
};
use crate::routes::{validation_failed, AppState};
use crate::services::GeocodeError;

/// Message shown to the user whenever routing fails
pub const ROUTING_FAILURE_MESSAGE: &str = "Failed to route the alert. Please try again.";

/// Configure alert routing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/alerts/route", web::post().to(route_alert))
        .route("/blood-requests", web::post().to(submit_blood_request));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = match &state.postgres {
        Some(postgres) => {
            if postgres.health_check().await.unwrap_or(false) {
                "healthy"
            } else {
                "degraded"
            }
        }
        None => "healthy",
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

fn routing_failed() -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: "Error".to_string(),
        message: ROUTING_FAILURE_MESSAGE.to_string(),
        status_code: 500,
    })
}

/// Route an alert to nearby donors
///
/// POST /api/v1/alerts/route
///
/// Request body:
/// ```json
/// {
///   "bloodType": "A+",
///   "hospitalLocation": { "latitude": 34.0522, "longitude": -118.2437 },
///   "urgency": "critical",
///   "radiusKm": 10
/// }
/// ```
async fn route_alert(
    state: web::Data<AppState>,
    req: web::Json<AlertRoutingRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for route_alert request: {:?}", errors);
        return validation_failed(errors);
    }

    match state.alerts.route_alert(&req).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            tracing::error!("Error routing alert: {}", e);
            routing_failed()
        }
    }
}

/// Submit a blood request by hospital name
///
/// POST /api/v1/blood-requests
///
/// Request body:
/// ```json
/// {
///   "bloodType": "O-",
///   "hospital": "City General Hospital, Los Angeles",
///   "urgency": "Critical"
/// }
/// ```
async fn submit_blood_request(
    state: web::Data<AppState>,
    form: web::Json<BloodRequestForm>,
) -> impl Responder {
    if let Err(errors) = form.validate() {
        return validation_failed(errors);
    }

    let form = form.into_inner();

    let hospital_location = match state.geocoder.locate(&form.hospital).await {
        Ok(point) => point,
        Err(GeocodeError::NotFound(name)) => {
            tracing::info!("Hospital not found: {:?}", name);
            return HttpResponse::UnprocessableEntity().json(ErrorResponse {
                error: "Unknown hospital".to_string(),
                message: format!("Could not find a location for {:?}", name),
                status_code: 422,
            });
        }
        Err(e) => {
            tracing::error!("Error locating hospital {:?}: {}", form.hospital, e);
            return routing_failed();
        }
    };

    let request = AlertRoutingRequest {
        blood_type: form.blood_type,
        hospital_location,
        urgency: form.urgency,
        radius_km: state.default_radius_km,
    };

    match state.alerts.route_alert(&request).await {
        Ok(response) => HttpResponse::Ok().json(BloodRequestResponse {
            hospital: form.hospital,
            hospital_location,
            urgency: form.urgency,
            radius_km: request.radius_km,
            donor_matches: response.donor_matches,
        }),
        Err(e) => {
            tracing::error!("Error routing alert: {}", e);
            routing_failed()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_routing_failure_body() {
        let response = routing_failed();
        assert_eq!(response.status(), actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.message, ROUTING_FAILURE_MESSAGE);
        assert_eq!(body.status_code, 500);
    }
}
