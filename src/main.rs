use sea_orm::Database;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use shopcart::config::Config;
use shopcart::entities::{seed_catalog, setup_schema};
use shopcart::{create_app, AppState};

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received SIGINT, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().expect("Invalid configuration");

    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    setup_schema(&db).await.expect("Failed to create schema");
    if config.seed_catalog {
        seed_catalog(&db).await.expect("Failed to seed catalog");
    }

    let app = create_app(AppState::new(db, &config));

    let listener = tokio::net::TcpListener::bind(config.addr())
        .await
        .expect("Failed to bind address");
    tracing::info!(addr = %config.addr(), "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}
