mod config;
mod core;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use crate::config::{LogFormat, Settings};
use crate::core::MatchFinder;
use crate::routes::matches::AppState;
use crate::services::{CachedOwnerRepository, DiscoveryService, MatchNotifier, PetDirectoryClient, RedisPublisher};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

fn init_logging(settings: &crate::config::LoggingSettings) {
    // LOG_LEVEL / LOG_FORMAT win over the config file
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_target(false)
        .with_level(true);

    match LogFormat::parse(&log_format) {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.pretty().init(),
        LogFormat::Compact => subscriber.compact().init(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_logging(&settings.logging);

    info!("Starting SNIF match discovery service...");

    let directory = Arc::new(
        PetDirectoryClient::new(
            settings.directory.base_url.clone(),
            settings.directory.api_key.clone(),
            Duration::from_secs(settings.directory.timeout_secs.unwrap_or(30)),
        )
        .map_err(|e| {
            error!("Failed to create pet directory client: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
        })?,
    );

    info!("Pet directory client initialized ({})", settings.directory.base_url);

    let owners = Arc::new(CachedOwnerRepository::new(
        directory.clone(),
        settings.cache.l1_cache_size,
        settings.cache.ttl_secs,
    ));

    info!(
        "Preferences cache initialized (L1: {} entries, TTL: {}s)",
        settings.cache.l1_cache_size, settings.cache.ttl_secs
    );

    let publisher = RedisPublisher::new(&settings.redis.url).await.map_err(|e| {
        error!("Failed to connect to Redis: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, "Redis connection required")
    })?;

    let routing = settings.notifications.routing_strategy();
    info!("Notification publisher initialized with routing {:?}", routing);

    let notifier = MatchNotifier::new(Arc::new(publisher), routing);
    let finder = MatchFinder::new(settings.matching.default_search_radius_km);

    let discovery = DiscoveryService::new(directory.clone(), owners, directory, notifier, finder);

    let app_state = AppState { discovery };

    let bind_addr = (settings.server.host.clone(), settings.server.port);
    let workers = settings.server.workers.unwrap_or(4);

    info!("Listening on {}:{} with {} workers", bind_addr.0, bind_addr.1, workers);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(crate::routes::configure_routes)
    })
    .workers(workers)
    .bind(bind_addr)?
    .run()
    .await
}
