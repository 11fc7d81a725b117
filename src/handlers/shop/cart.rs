use axum::extract::State;

use crate::db::{AppState, queries};
use crate::error::{AppError, OptionExt, Result, msg};
use crate::extractors::{Json, Path};
use crate::models::{AddToCart, CartSummary};
use crate::pricing;

fn require_user_id(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(AppError::Validation(msg::USER_ID_EMPTY.into()));
    }
    Ok(())
}

/// Add a product to the buyer's cart and return the updated summary.
pub async fn add_cart_item(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(input): Json<AddToCart>,
) -> Result<Json<CartSummary>> {
    require_user_id(&user_id)?;
    if input.quantity == 0 {
        return Err(AppError::Validation(msg::QUANTITY_INVALID.into()));
    }

    let mut conn = state.db.get()?;
    queries::get_product(&conn, &input.sku)?.or_not_found(msg::PRODUCT_NOT_FOUND)?;
    queries::add_to_cart(&mut conn, &user_id, &input.sku, input.quantity)?;

    tracing::debug!(user_id = %user_id, sku = %input.sku, quantity = input.quantity, "Added to cart");
    Ok(Json(pricing::cart_summary(&conn, &user_id)?))
}

pub async fn view_cart(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<CartSummary>> {
    require_user_id(&user_id)?;
    let conn = state.db.get()?;
    Ok(Json(pricing::cart_summary(&conn, &user_id)?))
}
