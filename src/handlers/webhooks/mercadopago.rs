use axum::{body::Bytes, extract::State, http::HeaderMap, response::IntoResponse};

use crate::db::AppState;
use crate::extractors::Json;
use crate::util::extract_header_token;

use super::common::{StatusNotification, WebhookAck, handle_status_notification};

pub const TOKEN_HEADER: &str = "x-token";

/// Payment processor notification: `{order_id, status}` authenticated by `x-token`.
///
/// Always answers 200 so the processor does not retry; failures show up in
/// the body and the logs.
pub async fn handle_mercadopago_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let token = extract_header_token(&headers, TOKEN_HEADER);
    let ack: WebhookAck =
        handle_status_notification(&state, token, StatusNotification::parse(&body)).await;
    Json(ack)
}
