use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use std::sync::Arc;
use std::time::Duration;
use todotrip_compat::config::{Settings, StoreKind};
use todotrip_compat::core::Matcher;
use todotrip_compat::models::MatchingRules;
use todotrip_compat::routes::{self, AppState};
use todotrip_compat::services::{
    AuthClient, HostedStore, InMemoryStore, PostgresStore, ProfileService, ProfileStore,
    TokenVerifier, TtlCache,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn io_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, e);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, e))
}

async fn build_store(settings: &Settings) -> std::io::Result<Arc<dyn ProfileStore>> {
    let timeout = Duration::from_secs(settings.backend.request_timeout_secs);

    let store: Arc<dyn ProfileStore> = match settings.store.kind {
        StoreKind::Hosted => Arc::new(
            HostedStore::new(
                settings.backend.url.clone(),
                settings.backend.api_key.clone(),
                settings.backend.personality_table.clone(),
                timeout,
            )
            .map_err(|e| io_error("Failed to create hosted store client", e))?,
        ),
        StoreKind::Postgres => {
            let db = settings
                .store
                .database
                .as_ref()
                .ok_or_else(|| io_error("Configuration error", "store.database is required for the postgres store"))?;

            Arc::new(
                PostgresStore::from_settings(
                    &db.url,
                    db.max_connections,
                    db.min_connections,
                    db.acquire_timeout_secs,
                    db.idle_timeout_secs,
                )
                .await
                .map_err(|e| io_error("PostgreSQL connection error", e))?,
            )
        }
        StoreKind::Memory => {
            warn!("Using in-memory profile store; results are lost on restart");
            Arc::new(InMemoryStore::new())
        }
    };

    info!("Profile store initialized ({:?})", settings.store.kind);

    Ok(store)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Starting ToDoTrip compatibility service...");

    let store = build_store(&settings).await?;

    let cache = TtlCache::new(
        settings.cache.capacity,
        Duration::from_secs(settings.cache.ttl_secs),
    );
    info!(
        "Profile cache initialized ({} entries, TTL: {}s)",
        settings.cache.capacity, settings.cache.ttl_secs
    );

    let profiles = Arc::new(ProfileService::new(
        store,
        cache,
        settings.store.fetch_retries,
        Duration::from_millis(settings.store.retry_delay_ms),
    ));

    let auth = Arc::new(
        AuthClient::new(
            settings.backend.url.clone(),
            settings.backend.api_key.clone(),
            Duration::from_secs(settings.backend.request_timeout_secs),
        )
        .map_err(|e| io_error("Failed to create auth client", e))?,
    );

    let verifier = Arc::new(TokenVerifier::new(
        &settings.backend.jwt_secret,
        &settings.backend.jwt_audience,
    ));

    let rules = MatchingRules {
        min_score: settings.matching.min_score,
        max_limit: settings.matching.max_limit,
    };
    let matcher = Matcher::new(rules);

    info!("Matcher initialized with rules: {:?}", rules);

    let app_state = AppState {
        profiles,
        auth,
        verifier,
        matcher,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
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
