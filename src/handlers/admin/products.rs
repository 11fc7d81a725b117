use axum::extract::State;
use serde::Serialize;

use crate::chat::{self, ChatSendResult};
use crate::db::{AppState, queries};
use crate::error::{AppError, OptionExt, Result, msg};
use crate::extractors::{Json, Path};
use crate::models::{PostProductCard, Product, SetDeliveryUrl, UpsertProduct};
use crate::seed::FEATURED_SKU;

pub async fn upsert_product(
    State(state): State<AppState>,
    Json(input): Json<UpsertProduct>,
) -> Result<Json<Product>> {
    let product = input.into_product()?;

    let conn = state.db.get()?;
    let saved = queries::upsert_product(&conn, &product)?;

    tracing::info!(sku = %saved.sku, price_cents = saved.price_cents, "Product saved");
    Ok(Json(saved))
}

pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let conn = state.db.get()?;
    Ok(Json(queries::list_products(&conn)?))
}

pub async fn set_delivery_url(
    State(state): State<AppState>,
    Path(sku): Path<String>,
    Json(input): Json<SetDeliveryUrl>,
) -> Result<Json<Product>> {
    let url = input.delivery_url.trim();
    if url.is_empty() {
        return Err(AppError::Validation("delivery_url must not be empty".into()));
    }

    let conn = state.db.get()?;
    let product = queries::set_delivery_url(&conn, &sku, url)?;

    tracing::info!(sku = %product.sku, "Delivery URL updated");
    Ok(Json(product))
}

#[derive(Debug, Serialize)]
pub struct PostedCard {
    pub sku: String,
    pub channel_id: String,
    /// False when the chat gateway is disabled
    pub posted: bool,
}

/// Post a product card into a sales channel.
pub async fn post_product_card(
    State(state): State<AppState>,
    Path(sku): Path<String>,
    Json(input): Json<PostProductCard>,
) -> Result<Json<PostedCard>> {
    let channel_id = input.channel_id.trim();
    if channel_id.is_empty() {
        return Err(AppError::Validation("channel_id must not be empty".into()));
    }

    let product = {
        let conn = state.db.get()?;
        queries::get_product(&conn, &sku)?.or_not_found(msg::PRODUCT_NOT_FOUND)?
    };

    let thumbnail = if product.sku == FEATURED_SKU {
        state.featured_image_url.as_deref()
    } else {
        None
    };
    let embed = chat::product_card_embed(&product, thumbnail);
    let result = state.chat.post_embed(channel_id, &embed).await?;

    Ok(Json(PostedCard {
        sku: product.sku,
        channel_id: channel_id.to_string(),
        posted: result == ChatSendResult::Sent,
    }))
}
