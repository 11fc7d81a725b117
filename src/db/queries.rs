use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};

use crate::error::{AppError, OptionExt, Result, msg};
use crate::models::*;

use super::from_row::{ORDER_COLS, PRODUCT_COLS, decode_items, query_all, query_one};

/// Upper bound for `list_recent_orders`.
pub const MAX_RECENT_ORDERS: i64 = 100;

fn now() -> i64 {
    Utc::now().timestamp()
}

fn encode_items(items: &CartItems) -> Result<String> {
    serde_json::to_string(items).map_err(Into::into)
}

// ============ Catalog ============

/// Insert or fully replace a product keyed by SKU.
pub fn upsert_product(conn: &Connection, product: &Product) -> Result<Product> {
    if product.sku.trim().is_empty() {
        return Err(AppError::Validation(msg::SKU_EMPTY.into()));
    }
    if product.price_cents < 0 {
        return Err(AppError::Validation(msg::NEGATIVE_PRICE.into()));
    }

    conn.execute(
        "INSERT INTO products (sku, name, price_cents, description, category, delivery_url)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(sku) DO UPDATE SET
            name = excluded.name,
            price_cents = excluded.price_cents,
            description = excluded.description,
            category = excluded.category,
            delivery_url = excluded.delivery_url",
        params![
            &product.sku,
            &product.name,
            product.price_cents,
            &product.description,
            &product.category,
            &product.delivery_url,
        ],
    )?;

    Ok(product.clone())
}

pub fn get_product(conn: &Connection, sku: &str) -> Result<Option<Product>> {
    query_one(
        conn,
        &format!("SELECT {} FROM products WHERE sku = ?1", PRODUCT_COLS),
        &[&sku],
    )
}

/// All products ordered by name (SKU breaks ties).
pub fn list_products(conn: &Connection) -> Result<Vec<Product>> {
    query_all(
        conn,
        &format!("SELECT {} FROM products ORDER BY name ASC, sku ASC", PRODUCT_COLS),
        &[],
    )
}

pub fn set_delivery_url(conn: &Connection, sku: &str, delivery_url: &str) -> Result<Product> {
    let updated: Option<Product> = conn
        .query_row(
            &format!(
                "UPDATE products SET delivery_url = ?1 WHERE sku = ?2 RETURNING {}",
                PRODUCT_COLS
            ),
            params![delivery_url, sku],
            <Product as super::from_row::FromRow>::from_row,
        )
        .optional()?;
    updated.or_not_found(msg::PRODUCT_NOT_FOUND)
}

pub fn count_products(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))
        .map_err(Into::into)
}

// ============ Carts ============

/// Stored cart for a user; empty when none exists.
pub fn get_cart(conn: &Connection, user_id: &str) -> Result<CartItems> {
    let json: Option<String> = conn
        .query_row(
            "SELECT items_json FROM carts WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )
        .optional()?;

    match json {
        Some(json) => decode_items(&json).map_err(|e| {
            AppError::Internal(format!("Stored cart for user {} is unreadable: {}", user_id, e))
        }),
        None => Ok(CartItems::new()),
    }
}

/// Replace the stored cart. An empty cart deletes the row.
pub fn save_cart(conn: &Connection, user_id: &str, items: &CartItems) -> Result<()> {
    let items = normalize_cart(items.clone());
    if items.is_empty() {
        return clear_cart(conn, user_id);
    }

    conn.execute(
        "INSERT INTO carts (user_id, items_json) VALUES (?1, ?2)
         ON CONFLICT(user_id) DO UPDATE SET items_json = excluded.items_json",
        params![user_id, encode_items(&items)?],
    )?;
    Ok(())
}

pub fn clear_cart(conn: &Connection, user_id: &str) -> Result<()> {
    conn.execute("DELETE FROM carts WHERE user_id = ?1", params![user_id])?;
    Ok(())
}

/// Add `quantity` of `sku` to a user's cart and return the updated cart.
///
/// The read-modify-write holds the database write lock from the first read, so
/// concurrent adds for the same user serialize instead of overwriting each other.
pub fn add_to_cart(
    conn: &mut Connection,
    user_id: &str,
    sku: &str,
    quantity: u32,
) -> Result<CartItems> {
    if quantity == 0 {
        return Err(AppError::Validation(msg::QUANTITY_INVALID.into()));
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let mut items = get_cart(&tx, user_id)?;
    let entry = items.entry(sku.to_string()).or_insert(0);
    *entry = entry
        .checked_add(quantity)
        .ok_or_else(|| AppError::Validation(msg::QUANTITY_INVALID.into()))?;
    save_cart(&tx, user_id, &items)?;

    tx.commit()?;
    Ok(items)
}

// ============ Orders ============

/// Record a new order in `pendente`. Items are stored as an owned snapshot.
pub fn create_order(conn: &Connection, input: &CreateOrder) -> Result<Order> {
    if input.total_cents < 0 {
        return Err(AppError::Validation(msg::NEGATIVE_PRICE.into()));
    }
    let created_at = now();
    let items = normalize_cart(input.items.clone());

    conn.execute(
        "INSERT INTO orders (user_id, items_json, total_cents, status, payment_link, external_ref, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            &input.user_id,
            encode_items(&items)?,
            input.total_cents,
            OrderStatus::Pending.as_str(),
            &input.payment_link,
            &input.external_ref,
            created_at,
        ],
    )?;

    Ok(Order {
        id: conn.last_insert_rowid(),
        user_id: input.user_id.clone(),
        items,
        total_cents: input.total_cents,
        status: OrderStatus::Pending,
        payment_link: input.payment_link.clone(),
        external_ref: input.external_ref.clone(),
        created_at,
    })
}

pub fn get_order(conn: &Connection, id: i64) -> Result<Option<Order>> {
    query_one(
        conn,
        &format!("SELECT {} FROM orders WHERE id = ?1", ORDER_COLS),
        &[&id],
    )
}

/// Most recent orders first. `limit` is clamped to `1..=MAX_RECENT_ORDERS`.
pub fn list_recent_orders(conn: &Connection, limit: i64) -> Result<Vec<Order>> {
    let limit = limit.clamp(1, MAX_RECENT_ORDERS);
    query_all(
        conn,
        &format!("SELECT {} FROM orders ORDER BY id DESC LIMIT ?1", ORDER_COLS),
        &[&limit],
    )
}

/// Move an order to `status`, checking the transition table inside the write lock.
///
/// A `link` overwrites the stored URL and processor reference; `None` keeps
/// them. Self-transitions succeed without changing the status, and the
/// returned `previous` is read under the same lock, so concurrent callers
/// never both observe a change.
pub fn update_order_status(
    conn: &mut Connection,
    id: i64,
    status: OrderStatus,
    link: Option<&PaymentLink>,
) -> Result<StatusChange> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let current = get_order(&tx, id)?.or_not_found(msg::ORDER_NOT_FOUND)?;
    if !current.status.can_transition_to(status) {
        return Err(AppError::Conflict(format!(
            "Cannot move order #{} from {} to {}",
            id, current.status, status
        )));
    }

    let order: Order = tx.query_row(
        &format!(
            "UPDATE orders SET status = ?1,
                payment_link = COALESCE(?2, payment_link),
                external_ref = COALESCE(?3, external_ref)
             WHERE id = ?4 RETURNING {}",
            ORDER_COLS
        ),
        params![
            status.as_str(),
            link.map(|l| l.url.as_str()),
            link.and_then(|l| l.external_ref.as_deref()),
            id
        ],
        <Order as super::from_row::FromRow>::from_row,
    )?;

    tx.commit()?;
    Ok(StatusChange {
        order,
        previous: current.status,
    })
}
