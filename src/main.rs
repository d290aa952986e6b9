// src/main.rs
use axum::{extract::Extension, Router};
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::{net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod common;
mod enhance;
mod services;
mod site;

use common::AppState;
use services::{OpenRouterConfig, OpenRouterService, PdfService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let api_key = env::var("OPENROUTER_API_KEY")
        .map_err(|_| anyhow::anyhow!("OPENROUTER_API_KEY must be set"))?;
    let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "./static".to_string());
    let scratch_dir = env::var("SCRATCH_DIR").unwrap_or_else(|_| "./scratch".to_string());

    let mut openrouter_config = OpenRouterConfig::new(api_key);
    if let Ok(base_url) = env::var("OPENROUTER_BASE_URL") {
        openrouter_config.base_url = base_url;
    }
    if let Ok(model) = env::var("OPENROUTER_MODEL") {
        openrouter_config.model = model;
    }

    // ========================================================================
    // DIRECTORY SETUP
    // ========================================================================

    tokio::fs::create_dir_all(&scratch_dir).await?;

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let openrouter_service = Arc::new(OpenRouterService::new(openrouter_config));
    info!("OpenRouterService initialized");

    let pdf_service = Arc::new(PdfService::new());
    info!("PdfService initialized");

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let app_state = AppState {
        openrouter_service,
        pdf_service,
        scratch_dir: PathBuf::from(scratch_dir),
        static_dir: PathBuf::from(&static_dir),
    };

    let shared = Arc::new(RwLock::new(app_state));

    // ========================================================================
    // ROUTER COMPOSITION
    // ========================================================================

    let app = Router::new()
        .merge(enhance::enhance_routes())
        .merge(site::site_routes(PathBuf::from(static_dir)))
        .layer(Extension(shared))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(3002);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
