pub mod config;
pub mod controllers;
pub mod dto;
pub mod error;
pub mod server;
pub mod validate;

pub use config::{load_app_config, AppConfig};
pub use error::AppError;
pub use server::AppState;
