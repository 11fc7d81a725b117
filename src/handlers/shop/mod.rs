//! Routes called by the chat front-end on behalf of a buyer.

mod cart;
mod checkout;

pub use cart::*;
pub use checkout::*;

use axum::{
    Router,
    routing::{get, post},
};

use crate::db::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/shop/{user_id}/cart", get(view_cart))
        .route("/shop/{user_id}/cart/items", post(add_cart_item))
        .route("/shop/{user_id}/checkout", post(checkout_cart))
}
