//! Row mapping trait and helpers for reducing boilerplate in queries.

use rusqlite::{Connection, OptionalExtension, Row, ToSql};

use crate::models::*;

/// Parse a string column into an enum type, converting parse errors to rusqlite errors.
fn parse_enum<T: std::str::FromStr>(row: &Row, col: usize, col_name: &str) -> rusqlite::Result<T> {
    row.get::<_, String>(col)?.parse::<T>().map_err(|_| {
        rusqlite::Error::InvalidColumnType(col, col_name.to_string(), rusqlite::types::Type::Text)
    })
}

/// Decode an `items_json` column. Zero quantities are dropped on read.
pub fn parse_items(row: &Row, col: usize) -> rusqlite::Result<CartItems> {
    let json: String = row.get(col)?;
    decode_items(&json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(e))
    })
}

pub fn decode_items(json: &str) -> serde_json::Result<CartItems> {
    serde_json::from_str::<CartItems>(json).map(normalize_cart)
}

/// Trait for constructing a type from a database row.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

/// Query for a single optional result.
pub fn query_one<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Option<T>> {
    conn.query_row(sql, params, T::from_row)
        .optional()
        .map_err(Into::into)
}

/// Query for multiple results.
pub fn query_all<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, T::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ============ SQL SELECT Constants ============

pub const PRODUCT_COLS: &str = "sku, name, price_cents, description, category, delivery_url";

pub const ORDER_COLS: &str =
    "id, user_id, items_json, total_cents, status, payment_link, external_ref, created_at";

// ============ FromRow Implementations ============

impl FromRow for Product {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Product {
            sku: row.get(0)?,
            name: row.get(1)?,
            price_cents: row.get(2)?,
            description: row.get(3)?,
            category: row.get(4)?,
            delivery_url: row.get(5)?,
        })
    }
}

impl FromRow for Order {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Order {
            id: row.get(0)?,
            user_id: row.get(1)?,
            items: parse_items(row, 2)?,
            total_cents: row.get(3)?,
            status: parse_enum(row, 4, "status")?,
            payment_link: row.get(5)?,
            external_ref: row.get(6)?,
            created_at: row.get(7)?,
        })
    }
}
