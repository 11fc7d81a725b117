use axum::extract::State;

use crate::checkout::{self, CheckoutReceipt};
use crate::db::AppState;
use crate::error::Result;
use crate::extractors::{Json, Path};

pub async fn checkout_cart(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<CheckoutReceipt>> {
    Ok(Json(checkout::checkout(&state, &user_id).await?))
}
