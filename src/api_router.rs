//! Combines the per-entity routers and the auth routes into one REST surface.
//!
//! Every CRUD route is open in the current design; only `/users/me` is gated
//! by the bearer-token extractor. A `route_layer` here is the single place to
//! change that.

use axum::{routing::get, Json, Router};
use std::sync::Arc;

use crate::shared::state::AppState;

pub fn configure_api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .merge(crate::auth::configure())
        .merge(crate::members::configure())
        .merge(crate::clients::configure())
        .merge(crate::vendors::configure())
        .merge(crate::projects::configure())
        .merge(crate::estimations::configure())
        .merge(crate::company::configure())
}

async fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Welcome to Forge Estimates API" }))
}
