//! # Bloglist API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::HttpServer;

use api_server::build_app;
use api_server::config::AppConfig;
use api_server::state::AppState;
use api_server::telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env()?;

    tracing::info!(
        environment = ?config.environment,
        "Starting bloglist API server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await?;
    let testing_routes = config.testing_routes_enabled();
    if testing_routes {
        tracing::warn!("Test mode: /api/testing/reset is mounted");
    }

    HttpServer::new(move || build_app(state.clone(), testing_routes))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await?;

    Ok(())
}
