pub mod common;
pub mod mercadopago;

pub use mercadopago::handle_mercadopago_webhook;

use axum::{Router, routing::post};

use crate::db::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/webhook/mp", post(handle_mercadopago_webhook))
}
