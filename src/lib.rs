//! notes-api: a REST notes server.
//!
//! Notes (`title`, `content`, timestamps) are served under `/api/notes`
//! with create, list, get, update and delete routes. Every request passes a
//! fixed-window rate limiter, and CORS is restricted to one configured
//! origin. Storage is PostgreSQL in production or an in-process map.

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod service;

use axum::{
    Router,
    extract::FromRef,
    http::{HeaderValue, Method, header, header::InvalidHeaderValue},
    routing::get,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

use config::{Config, ConfigError, StorageKind};
use handlers::rest;
use middleware::{RateLimiter, rate_limit};
use repository::{MemoryRepository, NoteRepository, PgRepository, RepositoryError};
use service::NoteService;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("store initialisation failed: {0}")]
    Repository(#[from] RepositoryError),

    #[error("invalid CORS origin: {0}")]
    Cors(#[from] InvalidHeaderValue),

    #[error("server i/o error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<NoteService>,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(repo: Arc<dyn NoteRepository>, config: &Config) -> Self {
        Self {
            service: Arc::new(NoteService::new(repo)),
            limiter: Arc::new(RateLimiter::new(&config.rate_limit)),
        }
    }
}

impl FromRef<AppState> for Arc<NoteService> {
    fn from_ref(state: &AppState) -> Self {
        state.service.clone()
    }
}

impl FromRef<AppState> for Arc<RateLimiter> {
    fn from_ref(state: &AppState) -> Self {
        state.limiter.clone()
    }
}

/// Opens the configured store. Postgres is connected with retries and migrated.
pub async fn build_repository(config: &Config) -> Result<Arc<dyn NoteRepository>, StartupError> {
    match config.storage {
        StorageKind::Memory => {
            tracing::warn!("Using in-memory storage, notes will not survive a restart");
            Ok(Arc::new(MemoryRepository::new()))
        }
        StorageKind::Postgres => {
            let Some(dsn) = config.database.dsn.as_deref() else {
                return Err(ConfigError::Invalid("database.dsn is required for postgres storage").into());
            };

            let mut repo = PgRepository::connect_with_retry(
                dsn,
                config.database.connect_attempts,
                config.database.retry_delay,
            )
            .await?;
            repo.migrate().await?;

            Ok(Arc::new(repo))
        }
    }
}

pub fn cors_layer(origin: &str) -> Result<CorsLayer, InvalidHeaderValue> {
    Ok(CorsLayer::new()
        .allow_origin(origin.parse::<HeaderValue>()?)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([
            header::RETRY_AFTER,
            middleware::rate_limit::LIMIT_HEADER,
            middleware::rate_limit::REMAINING_HEADER,
        ]))
}

pub fn build_router(state: AppState, cors_origin: &str) -> Result<Router, InvalidHeaderValue> {
    let limiter = state.limiter.clone();

    let router = Router::new()
        .route("/", get(handlers::root))
        .route(
            "/api/notes",
            get(rest::get_all_notes).post(rest::create_note),
        )
        .route(
            "/api/notes/{id}",
            get(rest::get_one_note)
                .put(rest::update_note)
                .delete(rest::delete_note),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", rest::ApiDoc::openapi()))
        .layer(axum::middleware::from_fn_with_state(limiter, rate_limit))
        .layer(cors_layer(cors_origin)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(router)
}
