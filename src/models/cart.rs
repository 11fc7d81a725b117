use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// SKU → quantity. Ordered so summaries and snapshots are deterministic.
pub type CartItems = BTreeMap<String, u32>;

/// Drop zero quantities; a SKU with quantity 0 is the same as an absent one.
pub fn normalize_cart(items: CartItems) -> CartItems {
    items.into_iter().filter(|(_, qty)| *qty > 0).collect()
}

#[derive(Debug, Deserialize)]
pub struct AddToCart {
    pub sku: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Priced view of a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub text: String,
    pub total_cents: i64,
    pub total_display: String,
    /// Only the lines still present in the catalog.
    pub items: CartItems,
}

impl CartSummary {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
