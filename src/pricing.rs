//! Cart pricing and the text shown to buyers and admins.

use rusqlite::Connection;

use crate::db::queries;
use crate::error::{AppError, Result, msg};
use crate::models::{CartItems, CartSummary};
use crate::money::{format_brl, line_total};

pub const EMPTY_CART_TEXT: &str = "Seu carrinho está vazio.";
pub const UNAVAILABLE_ITEMS_TEXT: &str = "(itens indisponíveis)";

/// Price the stored cart of `user_id` against the current catalog.
pub fn cart_summary(conn: &Connection, user_id: &str) -> Result<CartSummary> {
    let items = queries::get_cart(conn, user_id)?;
    summarize_items(conn, &items)
}

/// Price an arbitrary SKU → quantity map.
///
/// SKUs that are no longer in the catalog are left out of the text, the total
/// and the returned items.
pub fn summarize_items(conn: &Connection, items: &CartItems) -> Result<CartSummary> {
    let mut lines = Vec::with_capacity(items.len());
    let mut priced = CartItems::new();
    let mut total: i64 = 0;

    for (sku, &quantity) in items {
        if quantity == 0 {
            continue;
        }
        let Some(product) = queries::get_product(conn, sku)? else {
            tracing::debug!(sku = %sku, "Skipping SKU missing from catalog");
            continue;
        };

        let amount = line_total(product.price_cents, quantity)?;
        total = total
            .checked_add(amount)
            .ok_or_else(|| AppError::Validation(msg::TOTAL_OVERFLOW.into()))?;
        lines.push(format!(
            "• {} (x{}) — {}",
            product.name,
            quantity,
            format_brl(amount)
        ));
        priced.insert(sku.clone(), quantity);
    }

    if priced.is_empty() {
        return Ok(CartSummary {
            text: EMPTY_CART_TEXT.to_string(),
            total_cents: 0,
            total_display: format_brl(0),
            items: priced,
        });
    }

    Ok(CartSummary {
        text: format!("{}\n\n**Total:** {}", lines.join("\n"), format_brl(total)),
        total_cents: total,
        total_display: format_brl(total),
        items: priced,
    })
}

/// Item list for order log entries: `• {name} (x{qty})` per resolvable SKU.
pub fn itemized_list(conn: &Connection, items: &CartItems) -> Result<String> {
    let mut lines = Vec::with_capacity(items.len());
    for (sku, quantity) in items {
        if let Some(product) = queries::get_product(conn, sku)? {
            lines.push(format!("• {} (x{})", product.name, quantity));
        }
    }

    if lines.is_empty() {
        Ok(UNAVAILABLE_ITEMS_TEXT.to_string())
    } else {
        Ok(lines.join("\n"))
    }
}
