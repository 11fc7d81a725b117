mod orders;
mod products;

pub use orders::*;
pub use products::*;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::db::AppState;
use crate::middleware::admin_auth;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/products", put(upsert_product))
        .route("/admin/products", get(list_products))
        .route("/admin/products/{sku}/delivery-url", put(set_delivery_url))
        .route("/admin/products/{sku}/post", post(post_product_card))
        .route("/admin/orders", get(list_orders))
        .route("/admin/orders/{order_id}", get(get_order))
        .route("/admin/orders/{order_id}/payment-link", post(reissue_payment_link))
        .layer(middleware::from_fn_with_state(state, admin_auth))
}
