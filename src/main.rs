//! Contact & Catalog Backend
//!
//! A REST backend over a SQLite document store for contacts, products,
//! bookmarked links and catalog backups.

mod api;
mod config;
mod db;
mod errors;
mod models;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, LogFormat};
use db::Repository;
use models::{Backup, Contact, MyLink, Product};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    init_tracing(&config);

    tracing::info!("Starting Contact & Catalog Backend");
    tracing::info!("Database URL: {}", config.database_url);
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!("Allowed origin: {:?}", config.cors_origin);

    // A store we cannot open is unrecoverable
    let pool = match db::init_database(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to connect to the database: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Database connected successfully");
    let repo = Arc::new(Repository::new(pool));

    // Create application state
    let state = AppState {
        repo: repo.clone(),
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    repo.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

fn init_tracing(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(state.config.cors_origin.clone())
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.config.body_limit;

    // API routes
    let api_routes = Router::new()
        // Contacts
        .route("/contacts", get(api::list_documents::<Contact>))
        .route("/contacts", post(api::create_document::<Contact>))
        .route("/contacts/{id}", put(api::update_document::<Contact>))
        .route("/contacts/{id}", delete(api::delete_document::<Contact>))
        // Products
        .route("/products", get(api::list_documents::<Product>))
        .route("/products", post(api::create_document::<Product>))
        .route("/products/{id}", put(api::update_document::<Product>))
        .route("/products/{id}", delete(api::delete_document::<Product>))
        // Links
        .route("/mylinks", get(api::list_documents::<MyLink>))
        .route("/mylinks", post(api::create_document::<MyLink>))
        .route("/mylinks/{id}", put(api::update_document::<MyLink>))
        .route("/mylinks/{id}", delete(api::delete_document::<MyLink>))
        // Backups
        .route("/backups", get(api::list_documents::<Backup>))
        .route("/backups", post(api::create_document::<Backup>))
        .route("/backups/snapshot", post(api::create_snapshot));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
