use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware};
use lifeline_connect::config::{DonorSource, GeocodingProvider, RegistryBackend, Settings};
use lifeline_connect::core::AlertRouter;
use lifeline_connect::routes::{self, AppState};
use lifeline_connect::services::{
    AlertService, CacheManager, DonorDirectory, Geocoder, HttpGeocoder, MemoryRegistry,
    MockDonorDirectory, PostgresClient, Registry, ResourceDirectory,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, error, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match format {
        "pretty" => subscriber.pretty().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.init(),
    }
}

fn startup_error(message: String) -> std::io::Error {
    error!("{}", message);
    std::io::Error::other(message)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load()
        .map_err(|e| std::io::Error::other(format!("Configuration error: {}", e)))?;

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Starting Lifeline Connect alert routing service...");

    // Cache: Redis is optional, L1 always on
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(3600);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);

    let cache = match &settings.cache.redis_url {
        Some(url) => match CacheManager::new(url, l1_cache_size, cache_ttl).await {
            Ok(c) => {
                info!("Cache manager initialized with Redis (L1: {} entries, TTL: {}s)", l1_cache_size, cache_ttl);
                c
            }
            Err(e) => {
                warn!("Failed to connect to Redis ({}), running with in-memory cache only", e);
                CacheManager::in_memory(l1_cache_size, cache_ttl)
            }
        },
        None => CacheManager::in_memory(l1_cache_size, cache_ttl),
    };
    let cache = Arc::new(cache);

    // PostgreSQL only when a backend asks for it
    let needs_postgres = settings.donors.source == DonorSource::Postgres
        || settings.donors.registry == RegistryBackend::Postgres;

    let postgres = if needs_postgres {
        let url = settings.database.url.as_deref().ok_or_else(|| {
            startup_error("database.url (or DATABASE_URL) is required for the postgres backend".to_string())
        })?;

        let client = PostgresClient::from_settings(
            url,
            settings.database.max_connections,
            settings.database.min_connections,
            settings.database.acquire_timeout_secs,
            settings.database.idle_timeout_secs,
        )
        .await
        .map_err(|e| startup_error(format!("PostgreSQL connection error: {}", e)))?;

        info!("PostgreSQL client initialized");
        Some(Arc::new(client))
    } else {
        None
    };

    let directory = match (settings.donors.source, &postgres) {
        (DonorSource::Postgres, Some(pg)) => DonorDirectory::Postgres(pg.clone()),
        _ => DonorDirectory::Mock(MockDonorDirectory::new()),
    };

    let registry = match (settings.donors.registry, &postgres) {
        (RegistryBackend::Postgres, Some(pg)) => Registry::Postgres(pg.clone()),
        _ => Registry::Memory(MemoryRegistry::seeded()),
    };

    let geocoder = match settings.geocoding.provider {
        GeocodingProvider::Fixed => Geocoder::Fixed(settings.geocoding.fixed_location()),
        GeocodingProvider::Http => {
            let endpoint = settings.geocoding.endpoint.clone().ok_or_else(|| {
                startup_error("geocoding.endpoint is required for the http provider".to_string())
            })?;
            let http = HttpGeocoder::new(
                endpoint,
                &settings.geocoding.user_agent,
                Duration::from_secs(settings.geocoding.timeout_secs),
                cache.clone(),
            )
            .map_err(|e| startup_error(format!("Failed to create geocoding client: {}", e)))?;
            Geocoder::Http(http)
        }
    };

    let router = AlertRouter::new(settings.routing.compatibility, settings.routing.max_results);

    info!(
        "Alert router initialized (directory: {}, compatibility: {:?}, default radius: {} km)",
        directory.name(),
        settings.routing.compatibility,
        settings.routing.default_radius_km
    );

    let app_state = AppState {
        alerts: Arc::new(AlertService::new(directory, router)),
        geocoder: Arc::new(geocoder),
        registry: Arc::new(registry),
        resources: Arc::new(ResourceDirectory::new()),
        postgres,
        default_radius_km: settings.routing.default_radius_km,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
