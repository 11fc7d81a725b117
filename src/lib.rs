//! Vitrine - digital goods storefront for a chat platform
//!
//! Catalog, per-user carts, an order ledger with payment links issued through
//! Mercado Pago, and reconciliation of the processor's status notifications.

pub mod chat;
pub mod checkout;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod money;
pub mod payments;
pub mod pricing;
pub mod seed;
pub mod util;
