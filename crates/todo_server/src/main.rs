use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_line_number(true)
                .with_file(false),
        )
        .init();

    tracing::info!("Starting todo service...");

    let config = todo_api::load_app_config();

    if let Err(e) = todo_api::server::run(config).await {
        tracing::error!("Failed to run todo service: {}", e);
        std::process::exit(1);
    }
}
