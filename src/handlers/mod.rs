pub mod admin;
pub mod shop;
pub mod webhooks;

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::db::AppState;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        service: env!("CARGO_PKG_NAME"),
    })
}

/// Every route of the service, without state or outer layers.
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(health))
        .merge(shop::router())
        .merge(webhooks::router())
        .merge(admin::router(state))
}
