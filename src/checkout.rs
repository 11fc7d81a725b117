//! Checkout: turn a cart into an order and issue its payment link.

use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;

use crate::chat;
use crate::db::{AppState, queries};
use crate::error::{AppError, OptionExt, Result, msg};
use crate::models::{CartSummary, CreateOrder, Order, OrderStatus, PaymentLink};
use crate::payments::PaymentLinkRequest;
use crate::pricing;

pub const PAYMENT_TITLE: &str = "Pedido Discord";
pub const PAYMENT_DESCRIPTION: &str = "Produtos digitais";

#[derive(Debug, Serialize)]
pub struct CheckoutReceipt {
    pub order_id: i64,
    pub summary: String,
    pub total_cents: i64,
    pub total_display: String,
    pub payment_link: String,
    pub status: OrderStatus,
}

/// Price the cart, record the order and clear the cart in one transaction.
///
/// Only lines still in the catalog are frozen into the order.
pub fn place_order(conn: &mut Connection, user_id: &str) -> Result<(Order, CartSummary)> {
    if user_id.trim().is_empty() {
        return Err(AppError::Validation(msg::USER_ID_EMPTY.into()));
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let summary = pricing::cart_summary(&tx, user_id)?;
    if summary.is_empty() {
        return Err(AppError::Validation(msg::EMPTY_CART.into()));
    }

    let order = queries::create_order(
        &tx,
        &CreateOrder {
            user_id: user_id.to_string(),
            items: summary.items.clone(),
            total_cents: summary.total_cents,
            payment_link: None,
            external_ref: None,
        },
    )?;
    queries::clear_cart(&tx, user_id)?;

    tx.commit()?;
    Ok((order, summary))
}

/// Full checkout for a buyer.
///
/// If the payment link cannot be issued the order stays `pendente` and the
/// error names it, so an admin can reissue the link later.
pub async fn checkout(state: &AppState, user_id: &str) -> Result<CheckoutReceipt> {
    let (order, summary) = {
        let mut conn = state.db.get()?;
        place_order(&mut conn, user_id)?
    };

    tracing::info!(
        order_id = order.id,
        user_id = %order.user_id,
        total_cents = order.total_cents,
        "Order placed"
    );

    let link = issue_link(state, &order).await.map_err(|e| {
        tracing::error!(order_id = order.id, "Payment link issuance failed: {}", e);
        AppError::ExternalService(format!(
            "Pedido #{} criado, mas o link de pagamento falhou: {}",
            order.id, e
        ))
    })?;

    let order = {
        let mut conn = state.db.get()?;
        queries::update_order_status(&mut conn, order.id, OrderStatus::AwaitingPayment, Some(&link))?
            .order
    };

    log_new_order(state, &order).await;

    Ok(CheckoutReceipt {
        order_id: order.id,
        summary: summary.text,
        total_cents: order.total_cents,
        total_display: summary.total_display,
        payment_link: link.url,
        status: order.status,
    })
}

/// Issue a link for an order stuck in `pendente` and move it to `aguardando_pagamento`.
pub async fn reissue_payment_link(state: &AppState, order_id: i64) -> Result<Order> {
    let order = {
        let conn = state.db.get()?;
        queries::get_order(&conn, order_id)?.or_not_found(msg::ORDER_NOT_FOUND)?
    };

    if order.status != OrderStatus::Pending {
        return Err(AppError::Conflict(format!(
            "Order #{} is {}, only pendente orders get a new payment link",
            order.id, order.status
        )));
    }

    let link = issue_link(state, &order).await?;

    let order = {
        let mut conn = state.db.get()?;
        queries::update_order_status(&mut conn, order.id, OrderStatus::AwaitingPayment, Some(&link))?
            .order
    };

    tracing::info!(order_id = order.id, "Payment link reissued");
    log_new_order(state, &order).await;
    Ok(order)
}

async fn issue_link(state: &AppState, order: &Order) -> Result<PaymentLink> {
    state
        .payments
        .issue_link(&PaymentLinkRequest {
            order_id: order.id,
            title: PAYMENT_TITLE,
            description: PAYMENT_DESCRIPTION,
            amount_cents: order.total_cents,
            notification_url: state.notification_url.as_deref(),
        })
        .await
}

/// Best-effort "Novo Pedido" entry in the order log channel.
async fn log_new_order(state: &AppState, order: &Order) {
    let Some(channel_id) = state.order_log_channel_id.as_deref() else {
        return;
    };
    if let Err(e) = state
        .chat
        .post_embed(channel_id, &chat::new_order_embed(order))
        .await
    {
        tracing::warn!(order_id = order.id, "Failed to post new order log entry: {}", e);
    }
}
