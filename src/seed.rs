//! Default catalog entry created on first start.

use rusqlite::Connection;

use crate::db::queries;
use crate::error::Result;
use crate::models::Product;

pub const FEATURED_SKU: &str = "8BALL_GUIDE_PRO";

pub fn featured_product(delivery_url: &str) -> Product {
    Product {
        sku: FEATURED_SKU.to_string(),
        name: "8 Ball Pool – Guia Pro (PDF)".to_string(),
        price_cents: 2990,
        description: "Guia avançado de estratégias: mira, break, rotação e posicionamento."
            .to_string(),
        category: "jogos".to_string(),
        delivery_url: Some(delivery_url.to_string()).filter(|u| !u.is_empty()),
    }
}

/// Insert the featured product when the catalog is empty. Returns whether it did.
pub fn seed_catalog(conn: &Connection, delivery_url: &str) -> Result<bool> {
    if queries::count_products(conn)? > 0 {
        tracing::debug!("Catalog not empty, skipping seed");
        return Ok(false);
    }

    queries::upsert_product(conn, &featured_product(delivery_url))?;
    tracing::info!(sku = FEATURED_SKU, "Seeded default catalog product");
    Ok(true)
}
