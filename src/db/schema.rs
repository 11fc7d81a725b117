use rusqlite::Connection;

/// Initialize the store schema.
///
/// WAL lets the webhook endpoint read while a checkout holds the write lock.
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;

        -- Catalog (identity on sku, rows replaced wholesale by upsert)
        CREATE TABLE IF NOT EXISTS products (
            sku TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            price_cents INTEGER NOT NULL CHECK (price_cents >= 0),
            description TEXT NOT NULL DEFAULT '',
            category TEXT NOT NULL DEFAULT 'geral',
            delivery_url TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_products_name ON products(name);

        -- Carts (one JSON object sku -> quantity per user)
        CREATE TABLE IF NOT EXISTS carts (
            user_id TEXT PRIMARY KEY,
            items_json TEXT NOT NULL DEFAULT '{}'
        );

        -- Orders (items_json and total_cents frozen at creation)
        CREATE TABLE IF NOT EXISTS orders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            items_json TEXT NOT NULL,
            total_cents INTEGER NOT NULL CHECK (total_cents >= 0),
            status TEXT NOT NULL CHECK (status IN ('pendente', 'aguardando_pagamento', 'pago', 'pagamento_recusado')),
            payment_link TEXT,
            external_ref TEXT,
            created_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_orders_user ON orders(user_id);
        CREATE INDEX IF NOT EXISTS idx_orders_status ON orders(status);
        "#,
    )?;
    Ok(())
}
