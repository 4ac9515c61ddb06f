use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{ErrorResponse, OrganPledgeRequest, PledgeResponse, ProfileUpdateRequest};
use crate::routes::{validation_failed, AppState};
use crate::services::RegistryError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/pledges", web::post().to(create_pledge))
        .route("/profiles/{user_id}", web::get().to(get_profile))
        .route("/profiles/{user_id}", web::put().to(update_profile));
}

fn registry_error(context: &str, e: RegistryError) -> HttpResponse {
    match e {
        RegistryError::NotFound(message) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Not found".to_string(),
            message,
            status_code: 404,
        }),
        RegistryError::InvalidInput(message) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid input".to_string(),
            message,
            status_code: 400,
        }),
        RegistryError::Database(e) => {
            tracing::error!("{}: {}", context, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: context.to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Record an organ donation pledge
///
/// POST /api/v1/pledges
///
/// Request body:
/// ```json
/// {
///   "fullName": "string",
///   "email": "string",
///   "confirmPledge": true
/// }
/// ```
async fn create_pledge(
    state: web::Data<AppState>,
    req: web::Json<OrganPledgeRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    if !req.confirm_pledge {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: "confirmPledge must be true to register a pledge".to_string(),
            status_code: 400,
        });
    }

    match state.registry.record_pledge(&req.full_name, &req.email).await {
        Ok(pledge) => {
            tracing::info!("Recorded organ pledge {}", pledge.pledge_id);
            HttpResponse::Ok().json(PledgeResponse {
                success: true,
                pledge_id: pledge.pledge_id,
                pledged_at: pledge.pledged_at,
            })
        }
        Err(e) => registry_error("Failed to record pledge", e),
    }
}

/// GET /api/v1/profiles/{user_id}
async fn get_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let user_id = path.into_inner();

    match state.registry.get_profile(&user_id).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => registry_error("Failed to fetch profile", e),
    }
}

/// Update (or create) a donor profile
///
/// PUT /api/v1/profiles/{user_id}
///
/// Every field is optional; creating a profile needs `name` and `bloodType`.
async fn update_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<ProfileUpdateRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let user_id = path.into_inner();

    match state.registry.update_profile(&user_id, &req).await {
        Ok(profile) => {
            tracing::debug!("Updated profile for {}", user_id);
            HttpResponse::Ok().json(profile)
        }
        Err(e) => registry_error("Failed to update profile", e),
    }
}
