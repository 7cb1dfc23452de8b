//! Configuration for the todo service.
//!
//! Supports loading configuration from environment variables with fallback to defaults.
use std::path::PathBuf;

/// Runtime configuration for the HTTP server and its storage.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub db_path: PathBuf,
}

/// Load AppConfig from environment variables
///
/// Environment variables:
/// - `TODO_APP_PORT`: HTTP listen port (default: 3000)
/// - `TODO_DB_PATH`: SQLite database file (default: todoApplication.db)
pub fn load_app_config() -> AppConfig {
    AppConfig {
        port: std::env::var("TODO_APP_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000),
        db_path: std::env::var("TODO_DB_PATH")
            .ok()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("todoApplication.db")),
    }
}
