//! Database migration system.
//!
//! Migrations are embedded in the binary and run on startup before `init_db`.
//! The schema version is tracked via `PRAGMA user_version`.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use thiserror::Error;

/// A database migration.
pub struct Migration {
    /// Version number (sequential, starting from 1).
    pub version: i32,
    pub description: &'static str,
    pub up: fn(&Connection) -> rusqlite::Result<()>,
}

/// All migrations in order. Add new migrations to the end of this list.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "baseline",
        up: migration_001_baseline,
    },
    Migration {
        version: 2,
        description: "store money as integer centavos",
        up: migration_002_money_in_cents,
    },
];

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Failed to create backup at {path}: {reason}")]
    BackupFailed { path: PathBuf, reason: String },

    #[error("Migration {version} failed: {message}. Backup at: {backup_path}")]
    MigrationFailed {
        version: i32,
        message: String,
        backup_path: PathBuf,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub fn get_version(conn: &Connection) -> rusqlite::Result<i32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
}

fn set_version(conn: &Connection, version: i32) -> rusqlite::Result<()> {
    conn.pragma_update(None, "user_version", version)
}

fn is_file_database(db_path: &str) -> bool {
    db_path != ":memory:" && !db_path.starts_with("file:") && Path::new(db_path).exists()
}

/// Snapshot the live database to `{db_path}.pre_v{target}.bak` with `VACUUM INTO`.
///
/// One file per target version; a leftover from an earlier failed attempt is replaced.
fn backup_database(conn: &Connection, db_path: &str, target: i32) -> Result<PathBuf, MigrationError> {
    let path = PathBuf::from(format!("{}.pre_v{}.bak", db_path, target));
    let failed = |reason: String| MigrationError::BackupFailed {
        path: path.clone(),
        reason,
    };

    if path.exists() {
        fs::remove_file(&path).map_err(|e| failed(e.to_string()))?;
    }
    conn.execute("VACUUM INTO ?1", [path.to_string_lossy()])
        .map_err(|e| failed(e.to_string()))?;
    Ok(path)
}

/// Run pending migrations, each in its own transaction.
///
/// Existing file databases are snapshotted first; fresh and in-memory ones are not.
pub fn run_migrations(conn: &mut Connection, db_path: &str) -> Result<(), MigrationError> {
    let current_version = get_version(conn)?;

    let pending: Vec<_> = MIGRATIONS
        .iter()
        .filter(|m| m.version > current_version)
        .collect();

    if pending.is_empty() {
        tracing::debug!("Database at version {} (up to date)", current_version);
        return Ok(());
    }

    tracing::info!(
        "Database at version {}, {} migration(s) pending",
        current_version,
        pending.len()
    );

    let target = pending.last().map_or(current_version, |m| m.version);
    let backup_path = if is_file_database(db_path) && table_exists(conn, "products")? {
        let path = backup_database(conn, db_path, target)?;
        tracing::info!("Backup created: {}", path.display());
        Some(path)
    } else {
        tracing::debug!("Fresh or in-memory database, skipping backup");
        None
    };

    for migration in pending {
        tracing::info!(
            "Running migration {}: {}",
            migration.version,
            migration.description
        );

        let tx = conn.transaction()?;

        match (migration.up)(&tx) {
            Ok(()) => {
                set_version(&tx, migration.version)?;
                tx.commit()?;
                tracing::info!("Migration {} completed", migration.version);
            }
            Err(e) => {
                tracing::error!(
                    "Migration {} failed: {}. Database unchanged.",
                    migration.version,
                    e
                );
                return Err(MigrationError::MigrationFailed {
                    version: migration.version,
                    message: e.to_string(),
                    backup_path: backup_path.unwrap_or_default(),
                });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table],
        |row| row.get(0),
    )
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names.iter().any(|n| n == column))
}

// ============================================================================
// Migration Functions
// ============================================================================

/// Baseline. Fresh databases get their schema from `init_db`.
fn migration_001_baseline(conn: &Connection) -> rusqlite::Result<()> {
    if table_exists(conn, "products")? {
        tracing::debug!("Existing database detected, baseline migration is no-op");
    } else {
        tracing::debug!("Fresh database, schema will be created by init_db");
    }
    Ok(())
}

/// Rebuild stores created with REAL money columns and ISO-8601 `created_at`.
fn migration_002_money_in_cents(conn: &Connection) -> rusqlite::Result<()> {
    if table_exists(conn, "products")? && column_exists(conn, "products", "price")? {
        tracing::info!("Converting products.price to price_cents");
        conn.execute_batch(
            r#"
            CREATE TABLE products_new (
                sku TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                price_cents INTEGER NOT NULL CHECK (price_cents >= 0),
                description TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL DEFAULT 'geral',
                delivery_url TEXT
            );
            INSERT INTO products_new (sku, name, price_cents, description, category, delivery_url)
                SELECT sku, name, CAST(ROUND(price * 100) AS INTEGER),
                       COALESCE(description, ''), COALESCE(category, 'geral'), delivery_url
                FROM products;
            DROP TABLE products;
            ALTER TABLE products_new RENAME TO products;
            "#,
        )?;
    }

    if table_exists(conn, "orders")? && column_exists(conn, "orders", "total")? {
        tracing::info!("Converting orders.total to total_cents");
        conn.execute_batch(
            r#"
            CREATE TABLE orders_new (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                items_json TEXT NOT NULL,
                total_cents INTEGER NOT NULL CHECK (total_cents >= 0),
                status TEXT NOT NULL CHECK (status IN ('pendente', 'aguardando_pagamento', 'pago', 'pagamento_recusado')),
                payment_link TEXT,
                external_ref TEXT,
                created_at INTEGER NOT NULL
            );
            INSERT INTO orders_new (id, user_id, items_json, total_cents, status, payment_link, external_ref, created_at)
                SELECT id, user_id, items_json, CAST(ROUND(total * 100) AS INTEGER),
                       CASE WHEN status IN ('pendente', 'aguardando_pagamento', 'pago', 'pagamento_recusado')
                            THEN status ELSE 'pendente' END,
                       payment_link, external_ref,
                       COALESCE(CAST(strftime('%s', created_at) AS INTEGER), 0)
                FROM orders;
            DROP TABLE orders;
            ALTER TABLE orders_new RENAME TO orders;
            "#,
        )?;
    }

    Ok(())
}
