use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use log::{error, info};
use todo_core::{SqliteTodoStorage, TodoStorage};

use crate::config::AppConfig;
use crate::controllers::{agenda_controller, todo_controller};

pub struct AppState {
    pub storage: Arc<dyn TodoStorage>,
}

const DEFAULT_WORKER_COUNT: usize = 4;

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.configure(todo_controller::config)
        .configure(agenda_controller::config);
}

pub async fn run(config: AppConfig) -> Result<(), String> {
    info!("Starting todo service...");

    let storage: Arc<dyn TodoStorage> = Arc::new(SqliteTodoStorage::new(&config.db_path));
    storage
        .init()
        .await
        .map_err(|e| format!("Failed to initialize storage: {e}"))?;

    let app_state = web::Data::new(AppState { storage });

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Cors::permissive())
            .configure(app_config)
    })
    .workers(DEFAULT_WORKER_COUNT)
    .bind(format!("127.0.0.1:{}", config.port))
    .map_err(|e| format!("Failed to bind server: {e}"))?
    .run();

    info!("Server Running at http://127.0.0.1:{}/", config.port);

    if let Err(e) = server.await {
        error!("Web server error: {}", e);
        return Err(format!("Web server error: {e}"));
    }

    Ok(())
}
