use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use dotenvy::dotenv;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use forgeserver::api_router::configure_api_routes;
use forgeserver::bootstrap::{ensure_admin_member, run_startup_migrations};
use forgeserver::config::AppConfig;
use forgeserver::middleware::private_network_preflight;
use forgeserver::security::jwt::TokenService;
use forgeserver::shared::state::AppState;
use forgeserver::shared::utils::create_conn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().context("Failed to load config from env")?;
    let pool = create_conn(&config).context("Failed to create database pool")?;

    run_startup_migrations(&pool)?;
    ensure_admin_member(&pool)?;

    let tokens = TokenService::from_env()?;
    let cors = build_cors(&config);

    let app_state = Arc::new(AppState {
        conn: pool,
        config: config.clone(),
        tokens,
    });

    let app = configure_api_routes()
        .with_state(app_state)
        .layer(cors)
        .layer(axum::middleware::from_fn(private_network_preflight))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    info!("HTTP server listening on {addr}");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")
}

fn build_cors(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    info!("Shutdown signal received");
}
