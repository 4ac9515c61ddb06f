use actix_web::{web, HttpResponse, Responder};

use crate::models::NearbyResponse;
use crate::routes::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/nearby", web::get().to(nearby));
}

/// List nearby blood banks and hospitals
///
/// GET /api/v1/nearby
async fn nearby(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(NearbyResponse {
        blood_banks: state.resources.blood_banks().to_vec(),
        hospitals: state.resources.hospitals().to_vec(),
    })
}
