//! Reconciliation of payment status notifications against the order ledger.

use rusqlite::Connection;
use serde::Serialize;
use serde_json::Value;

use crate::chat;
use crate::db::{AppState, queries};
use crate::error::AppError;
use crate::models::{Order, OrderStatus};
use crate::pricing;
use crate::util::secrets_match;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookAck {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl WebhookAck {
    pub fn ok() -> Self {
        Self { ok: true, error: None }
    }

    pub fn invalid_token() -> Self {
        Self {
            ok: false,
            error: Some("invalid token"),
        }
    }
}

/// Fields read from a notification body. Anything unparseable is `None`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatusNotification {
    pub order_id: Option<i64>,
    pub status: Option<String>,
}

impl StatusNotification {
    /// `order_id` may be an integer or a numeric string.
    pub fn parse(body: &[u8]) -> Self {
        let Ok(value) = serde_json::from_slice::<Value>(body) else {
            return Self::default();
        };

        let order_id = match value.get("order_id") {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        let status = value
            .get("status")
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self { order_id, status }
    }
}

/// What a notification did to the ledger.
#[derive(Debug)]
pub enum ReconcileOutcome {
    Applied { order: Order, changed: bool },
    Ignored(&'static str),
}

/// Apply a notification to the ledger. Never fails: every problem becomes `Ignored`.
pub fn apply_notification(conn: &mut Connection, notification: &StatusNotification) -> ReconcileOutcome {
    let (Some(order_id), Some(raw_status)) = (notification.order_id, notification.status.as_deref())
    else {
        tracing::debug!("Notification without order_id/status, ignoring");
        return ReconcileOutcome::Ignored("missing fields");
    };

    let Some(status) = OrderStatus::from_processor_status(raw_status) else {
        tracing::warn!(order_id, status = %raw_status, "Unknown payment status, ignoring");
        return ReconcileOutcome::Ignored("unknown status");
    };

    match queries::update_order_status(conn, order_id, status, None) {
        Ok(change) => {
            let changed = change.changed();
            tracing::info!(order_id, status = %change.order.status, changed, "Order status reconciled");
            ReconcileOutcome::Applied {
                order: change.order,
                changed,
            }
        }
        Err(AppError::Conflict(reason)) => {
            tracing::warn!(order_id, "Ignoring notification: {}", reason);
            ReconcileOutcome::Ignored("illegal transition")
        }
        Err(AppError::NotFound(_)) => {
            tracing::warn!(order_id, "Notification for unknown order, ignoring");
            ReconcileOutcome::Ignored("order not found")
        }
        Err(e) => {
            tracing::error!(order_id, "Failed to update order status: {}", e);
            ReconcileOutcome::Ignored("database error")
        }
    }
}

/// Authenticate, reconcile and fan out notifications.
pub async fn handle_status_notification(
    state: &AppState,
    token: Option<&str>,
    notification: StatusNotification,
) -> WebhookAck {
    if !secrets_match(&state.webhook_token, token.unwrap_or_default()) {
        tracing::warn!("Payment notification rejected: invalid token");
        return WebhookAck::invalid_token();
    }

    let (order, changed, items_text) = {
        let mut conn = match state.db.get() {
            Ok(c) => c,
            Err(e) => {
                tracing::error!("DB connection error: {}", e);
                return WebhookAck::ok();
            }
        };

        let (order, changed) = match apply_notification(&mut conn, &notification) {
            ReconcileOutcome::Applied { order, changed } => (order, changed),
            ReconcileOutcome::Ignored(_) => return WebhookAck::ok(),
        };

        let items_text = pricing::itemized_list(&conn, &order.items).unwrap_or_else(|e| {
            tracing::warn!(order_id = order.id, "Failed to resolve order items: {}", e);
            pricing::UNAVAILABLE_ITEMS_TEXT.to_string()
        });
        (order, changed, items_text)
    };

    spawn_notifications(state.clone(), order, changed, items_text);
    WebhookAck::ok()
}

/// Buyer DM (on a fresh `pago`) and order log entry, off the request path.
fn spawn_notifications(state: AppState, order: Order, changed: bool, items_text: String) {
    tokio::spawn(async move {
        if changed && order.status == OrderStatus::Paid {
            let message = chat::payment_confirmed_message(order.id);
            if let Err(e) = state.chat.send_direct_message(&order.user_id, &message).await {
                tracing::warn!(order_id = order.id, "Failed to DM buyer: {}", e);
            }
        }

        if let Some(channel_id) = state.order_log_channel_id.as_deref() {
            let embed = chat::order_update_embed(&order, &items_text);
            if let Err(e) = state.chat.post_embed(channel_id, &embed).await {
                tracing::warn!(order_id = order.id, "Failed to post order log entry: {}", e);
            }
        }
    });
}
