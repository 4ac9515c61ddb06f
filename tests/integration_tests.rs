// Integration tests for the Lifeline Connect HTTP API

use actix_web::{http::StatusCode, test, web, App};
use lifeline_connect::core::AlertRouter;
use lifeline_connect::models::{
    AlertRoutingResponse, BloodRequestResponse, BloodType, CompatibilityRule, DonorProfile,
    ErrorResponse, GeoPoint, HealthResponse, NearbyResponse, PledgeResponse,
};
use lifeline_connect::routes::{self, alerts::ROUTING_FAILURE_MESSAGE, AppState};
use lifeline_connect::services::{
    AlertService, CacheManager, DonorDirectory, Geocoder, HttpGeocoder, MemoryRegistry,
    MockDonorDirectory, Registry, ResourceDirectory,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn create_state(rule: CompatibilityRule) -> AppState {
    create_state_with_geocoder(rule, Geocoder::Fixed(GeoPoint::new(34.0522, -118.2437)))
}

fn create_state_with_geocoder(rule: CompatibilityRule, geocoder: Geocoder) -> AppState {
    AppState {
        alerts: Arc::new(AlertService::new(
            DonorDirectory::Mock(MockDonorDirectory::new()),
            AlertRouter::new(rule, None),
        )),
        geocoder: Arc::new(geocoder),
        registry: Arc::new(Registry::Memory(MemoryRegistry::seeded())),
        resources: Arc::new(ResourceDirectory::new()),
        postgres: None,
        default_radius_km: 10.0,
    }
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(routes::configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health_without_database() {
    let app = init_app!(create_state(CompatibilityRule::Exact));

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: HealthResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.status, "healthy");
}

#[actix_web::test]
async fn test_route_alert_end_to_end() {
    let app = init_app!(create_state(CompatibilityRule::Exact));

    let req = test::TestRequest::post()
        .uri("/api/v1/alerts/route")
        .set_json(json!({
            "bloodType": "AB-",
            "hospitalLocation": { "latitude": 34.0522, "longitude": -118.2437 },
            "urgency": "Critical",
            "radiusKm": 10
        }))
        .to_request();

    let body: AlertRoutingResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.donor_matches.len(), 2);
    for m in &body.donor_matches {
        assert_eq!(m.blood_type, BloodType::AbNegative);
        assert!(m.is_compatible);
        assert!(m.distance_km < 2.0);
    }
    assert!(body.donor_matches[0].distance_km <= body.donor_matches[1].distance_km);
}

#[actix_web::test]
async fn test_route_alert_wire_format_is_camel_case() {
    let app = init_app!(create_state(CompatibilityRule::Exact));

    let req = test::TestRequest::post()
        .uri("/api/v1/alerts/route")
        .set_json(json!({
            "bloodType": "O+",
            "hospitalLocation": { "latitude": 34.0522, "longitude": -118.2437 },
            "urgency": "low",
            "radiusKm": 10
        }))
        .to_request();

    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let first = &body["donorMatches"][0];

    assert!(first["donorId"].is_string());
    assert_eq!(first["bloodType"], "O+");
    assert!(first["location"]["latitude"].is_number());
    assert!(first["distanceKm"].is_number());
    assert_eq!(first["isCompatible"], true);
}

#[actix_web::test]
async fn test_route_alert_rejects_invalid_radius() {
    let app = init_app!(create_state(CompatibilityRule::Exact));

    let req = test::TestRequest::post()
        .uri("/api/v1/alerts/route")
        .set_json(json!({
            "bloodType": "A+",
            "hospitalLocation": { "latitude": 34.0522, "longitude": -118.2437 },
            "urgency": "high",
            "radiusKm": -5
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "Validation failed");
}

#[actix_web::test]
async fn test_route_alert_rejects_unknown_blood_type() {
    let app = init_app!(create_state(CompatibilityRule::Exact));

    let req = test::TestRequest::post()
        .uri("/api/v1/alerts/route")
        .set_json(json!({
            "bloodType": "Z+",
            "hospitalLocation": { "latitude": 34.0522, "longitude": -118.2437 },
            "urgency": "high",
            "radiusKm": 10
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());
}

#[actix_web::test]
async fn test_blood_request_form_uses_fixed_location_and_default_radius() {
    let app = init_app!(create_state(CompatibilityRule::Exact));

    let req = test::TestRequest::post()
        .uri("/api/v1/blood-requests")
        .set_json(json!({
            "bloodType": "B+",
            "hospital": "City General Hospital, Los Angeles",
            "urgency": "Medium"
        }))
        .to_request();

    let body: BloodRequestResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.hospital, "City General Hospital, Los Angeles");
    assert_eq!(body.hospital_location, GeoPoint::new(34.0522, -118.2437));
    assert_eq!(body.radius_km, 10.0);
    assert_eq!(body.donor_matches.len(), 2);
}

#[actix_web::test]
async fn test_route_alert_accepts_lowercase_padded_blood_type() {
    let app = init_app!(create_state(CompatibilityRule::Exact));

    let req = test::TestRequest::post()
        .uri("/api/v1/alerts/route")
        .set_json(json!({
            "bloodType": " ab+ ",
            "hospitalLocation": { "latitude": 34.0522, "longitude": -118.2437 },
            "urgency": "critical",
            "radiusKm": 10
        }))
        .to_request();

    let body: AlertRoutingResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.donor_matches.len(), 2);
    assert!(body.donor_matches.iter().all(|m| m.blood_type == BloodType::AbPositive));
}

#[actix_web::test]
async fn test_route_alert_small_radius_is_valid() {
    let app = init_app!(create_state(CompatibilityRule::Exact));

    let req = test::TestRequest::post()
        .uri("/api/v1/alerts/route")
        .set_json(json!({
            "bloodType": "A+",
            "hospitalLocation": { "latitude": 34.0522, "longitude": -118.2437 },
            "urgency": "high",
            "radiusKm": 0.05
        }))
        .to_request();

    let body: AlertRoutingResponse = test::call_and_read_body_json(&app, req).await;

    // Mock donors sit ~1.4km away
    assert!(body.donor_matches.is_empty());
}

#[actix_web::test]
async fn test_malformed_json_gets_json_error() {
    let app = init_app!(create_state(CompatibilityRule::Exact));

    let req = test::TestRequest::post()
        .uri("/api/v1/alerts/route")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"bloodType\": ")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_json");
}

#[actix_web::test]
async fn test_blood_request_geocoder_outage_returns_generic_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/search")
        .match_query(mockito::Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let geocoder = HttpGeocoder::new(
        server.url(),
        "lifeline-test",
        Duration::from_secs(5),
        Arc::new(CacheManager::in_memory(100, 60)),
    )
    .unwrap();
    let app = init_app!(create_state_with_geocoder(
        CompatibilityRule::Exact,
        Geocoder::Http(geocoder)
    ));

    let req = test::TestRequest::post()
        .uri("/api/v1/blood-requests")
        .set_json(json!({
            "bloodType": "O-",
            "hospital": "City General Hospital, Los Angeles",
            "urgency": "Critical"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.message, ROUTING_FAILURE_MESSAGE);
}

#[actix_web::test]
async fn test_profile_update_rejects_oversized_donation_count() {
    let app = init_app!(create_state(CompatibilityRule::Exact));

    let req = test::TestRequest::put()
        .uri("/api/v1/profiles/demo")
        .set_json(json!({ "donations": 20000 }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_blood_request_form_requires_hospital() {
    let app = init_app!(create_state(CompatibilityRule::Exact));

    let req = test::TestRequest::post()
        .uri("/api/v1/blood-requests")
        .set_json(json!({
            "bloodType": "B+",
            "hospital": "",
            "urgency": "Medium"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_nearby_lists_resources() {
    let app = init_app!(create_state(CompatibilityRule::Exact));

    let req = test::TestRequest::get().uri("/api/v1/nearby").to_request();
    let body: NearbyResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.blood_banks.len(), 3);
    assert_eq!(body.hospitals.len(), 3);
    assert_eq!(body.blood_banks[0].name, "LifeSource Blood Center");
    assert!(body.hospitals[0].map_url.starts_with("https://maps.google.com/?q="));
}

#[actix_web::test]
async fn test_pledge_flow() {
    let app = init_app!(create_state(CompatibilityRule::Exact));

    let pledge = json!({
        "fullName": "Jordan Lee",
        "email": "jordan@example.com",
        "confirmPledge": true
    });

    let req = test::TestRequest::post().uri("/api/v1/pledges").set_json(&pledge).to_request();
    let first: PledgeResponse = test::call_and_read_body_json(&app, req).await;
    assert!(first.success);

    let req = test::TestRequest::post().uri("/api/v1/pledges").set_json(&pledge).to_request();
    let second: PledgeResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(first.pledge_id, second.pledge_id);
}

#[actix_web::test]
async fn test_pledge_requires_confirmation() {
    let app = init_app!(create_state(CompatibilityRule::Exact));

    let req = test::TestRequest::post()
        .uri("/api/v1/pledges")
        .set_json(json!({
            "fullName": "Jordan Lee",
            "email": "jordan@example.com",
            "confirmPledge": false
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_profile_get_and_update() {
    let app = init_app!(create_state(CompatibilityRule::Exact));

    let req = test::TestRequest::get().uri("/api/v1/profiles/demo").to_request();
    let profile: DonorProfile = test::call_and_read_body_json(&app, req).await;
    assert_eq!(profile, DonorProfile::demo());

    let req = test::TestRequest::put()
        .uri("/api/v1/profiles/demo")
        .set_json(json!({ "lastDonation": "2024-09-01", "donations": 6 }))
        .to_request();
    let updated: DonorProfile = test::call_and_read_body_json(&app, req).await;

    assert_eq!(updated.name, "Alex Doe");
    assert_eq!(updated.donations, 6);
    assert_eq!(updated.last_donation, chrono::NaiveDate::from_ymd_opt(2024, 9, 1));
}

#[actix_web::test]
async fn test_profile_not_found() {
    let app = init_app!(create_state(CompatibilityRule::Exact));

    let req = test::TestRequest::get().uri("/api/v1/profiles/nobody").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[::core::prelude::v1::test]
fn test_mock_directory_blocking() {
    let directory = DonorDirectory::Mock(MockDonorDirectory::new());
    let query = lifeline_connect::models::DonorQuery {
        blood_type: BloodType::ONegative,
        hospital_location: GeoPoint::new(34.0522, -118.2437),
        radius_km: 10.0,
        accepted_types: vec![BloodType::ONegative],
    };

    let donors = tokio_test::block_on(directory.find_nearest(&query)).unwrap();
    assert_eq!(donors.len(), 2);
}
