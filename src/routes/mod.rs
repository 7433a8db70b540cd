//! HTTP routes
//!
//! One router per resource, assembled by `create_router`.

pub mod customer_routes;
pub mod tariff_routes;
pub mod vehicle_import_routes;
pub mod vehicle_master_routes;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_middleware;
use crate::state::AppState;

/// Full application router
pub fn create_router(state: AppState) -> Router {
    let cors = cors_middleware(&state.config.cors_origins);
    let max_file_bytes = state.config.import_max_file_bytes;

    Router::new()
        .route("/health", get(health))
        .nest(
            "/api/vehicle-import",
            vehicle_import_routes::create_vehicle_import_router(max_file_bytes),
        )
        .nest("/api/customer", customer_routes::create_customer_router())
        .nest(
            "/api/vehicle-master",
            vehicle_master_routes::create_vehicle_master_router(),
        )
        .nest("/api/tariff", tariff_routes::create_tariff_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
