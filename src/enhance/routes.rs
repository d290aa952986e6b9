// src/enhance/routes.rs

use axum::{routing::post, Router};

use crate::enhance::handlers;

pub fn enhance_routes() -> Router {
    Router::new().route("/generate", post(handlers::generate))
}
