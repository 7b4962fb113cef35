//! Configuration module for the catalog backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;

use axum::http::HeaderValue;

/// Default request body limit. Backups carry whole collections as text.
const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Store connection string (SQLite URL)
    pub database_url: String,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// The single origin allowed to make cross-origin requests
    pub cors_origin: HeaderValue,
    /// Maximum accepted request body size in bytes
    pub body_limit: usize,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let database_url = env::var("CRM_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/crm.sqlite".to_string());

        let host = env::var("CRM_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        // CRM_PORT wins over the conventional PORT set by hosting platforms.
        let port = env::var("CRM_PORT")
            .or_else(|_| env::var("PORT"))
            .unwrap_or_else(|_| "3001".to_string());
        let port: u16 = port
            .parse()
            .map_err(|_| format!("Invalid port: {}", port))?;
        let bind_addr = format!("{}:{}", host, port)
            .parse()
            .map_err(|_| format!("Invalid bind address: {}:{}", host, port))?;

        let origin =
            env::var("CRM_CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let cors_origin = HeaderValue::from_str(&origin)
            .map_err(|_| format!("Invalid CRM_CORS_ORIGIN: {}", origin))?;

        let body_limit = match env::var("CRM_BODY_LIMIT_BYTES") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| format!("Invalid CRM_BODY_LIMIT_BYTES: {}", raw))?,
            Err(_) => DEFAULT_BODY_LIMIT,
        };

        let log_level = env::var("CRM_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = match env::var("CRM_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            database_url,
            bind_addr,
            cors_origin,
            body_limit,
            log_level,
            log_format,
        })
    }
}
