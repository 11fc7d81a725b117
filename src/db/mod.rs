mod from_row;
pub mod migrations;
pub mod queries;
mod schema;

pub use schema::init_db;

use std::sync::Arc;
use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::chat::ChatGateway;
use crate::payments::PaymentGateway;

pub type DbPool = Pool<SqliteConnectionManager>;

/// How long a connection waits on the write lock before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Catalog, carts and orders
    pub db: DbPool,
    /// Bearer key for admin routes (None = admin API disabled)
    pub admin_api_key: Option<String>,
    /// Shared secret for inbound payment notifications
    pub webhook_token: String,
    /// Notification URL handed to the payment processor, if publicly reachable
    pub notification_url: Option<String>,
    /// Channel receiving order log entries
    pub order_log_channel_id: Option<String>,
    /// Thumbnail used for the featured product card
    pub featured_image_url: Option<String>,
    pub payments: Arc<PaymentGateway>,
    pub chat: Arc<ChatGateway>,
}

pub fn create_pool(database_path: &str) -> Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::file(database_path).with_init(configure_connection);
    Pool::builder().max_size(10).build(manager)
}

/// Per-connection settings applied by the pool.
pub fn configure_connection(conn: &mut rusqlite::Connection) -> rusqlite::Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")
}
