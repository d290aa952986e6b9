// src/site.rs
//! Static entry page and asset serving

use axum::{
    extract::Extension,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::services::ServeDir;
use tracing::error;

use crate::common::{ApiError, AppState};

/// GET / plus a static file fallback under the same root
pub fn site_routes(static_dir: PathBuf) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .fallback_service(ServeDir::new(static_dir))
}

/// GET / - Serve the upload form
async fn serve_index(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await;
    let index_path = state.static_dir.join("index.html");

    let html = tokio::fs::read_to_string(&index_path).await.map_err(|e| {
        error!(error = %e, path = %index_path.display(), "Failed to read index page");
        ApiError::InternalServer("Entry page is unavailable".to_string())
    })?;

    Ok(Html(html))
}
