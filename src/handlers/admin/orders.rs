use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::checkout;
use crate::db::{AppState, queries};
use crate::error::{OptionExt, Result, msg};
use crate::extractors::{Json, Path, Query};
use crate::models::Order;

pub const DEFAULT_ORDER_LIMIT: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct OrderList {
    pub orders: Vec<Order>,
    /// One `#id • user:… • status • total` line per order
    pub lines: Vec<String>,
}

pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<OrderList>> {
    let conn = state.db.get()?;
    let orders = queries::list_recent_orders(&conn, query.limit.unwrap_or(DEFAULT_ORDER_LIMIT))?;
    let lines = orders.iter().map(Order::display_line).collect();
    Ok(Json(OrderList { orders, lines }))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
) -> Result<Json<Order>> {
    let conn = state.db.get()?;
    let order = queries::get_order(&conn, order_id)?.or_not_found(msg::ORDER_NOT_FOUND)?;
    Ok(Json(order))
}

pub async fn reissue_payment_link(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
) -> Result<Json<Order>> {
    Ok(Json(checkout::reissue_payment_link(&state, order_id).await?))
}
