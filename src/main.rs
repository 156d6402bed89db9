use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use rental_service::config::Settings;
use rental_service::core::{ChatResponder, ListingLookup, RandomSelector, ReplySelector, SeededSelector};
use rental_service::routes::{self, handle_json_payload_error, handle_query_payload_error, AppState};
use rental_service::services::{JwtService, PasswordHasher, PostgresClient};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Logging is configured from the settings, so they load first
    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let logging = settings
        .logging
        .clone()
        .with_overrides(std::env::var("LOG_LEVEL").ok(), std::env::var("LOG_FORMAT").ok());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true);

    if logging.is_pretty() {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }

    info!("Starting rental listing service...");
    info!("Configuration loaded successfully");

    let db_max_conn = settings.database.max_connections.unwrap_or(10);

    let postgres = Arc::new(
        PostgresClient::from_settings(
            &settings.database.url,
            Some(db_max_conn),
            settings.database.min_connections,
            settings.database.acquire_timeout_secs,
            settings.database.idle_timeout_secs,
        )
        .await
        .map_err(|e| {
            error!("Failed to connect to PostgreSQL: {}", e);
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())
        })?,
    );

    info!("PostgreSQL client initialized (max: {} connections)", db_max_conn);

    let jwt = web::Data::new(JwtService::new(
        &settings.auth.jwt_secret,
        settings.auth.issuer.clone(),
        settings.auth.token_ttl_hours,
    ));

    let selector: Arc<dyn ReplySelector> = match settings.chatbot.reply_seed {
        Some(seed) => {
            info!("Chatbot replies seeded with {}", seed);
            Arc::new(SeededSelector::new(seed))
        }
        None => Arc::new(RandomSelector),
    };
    let lookup: Arc<dyn ListingLookup> = postgres.clone();
    let responder = web::Data::new(ChatResponder::new(lookup, selector));

    let app_state = AppState {
        postgres,
        hasher: PasswordHasher::new(settings.auth.bcrypt_cost),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(jwt.clone())
            .app_data(responder.clone())
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
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
