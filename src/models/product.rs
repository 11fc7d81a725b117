use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result, msg};
use crate::money;

pub const DEFAULT_CATEGORY: &str = "geral";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub sku: String,
    pub name: String,
    /// Price in centavos.
    pub price_cents: i64,
    pub description: String,
    pub category: String,
    pub delivery_url: Option<String>,
}

/// Admin request to register or fully replace a product.
#[derive(Debug, Deserialize)]
pub struct UpsertProduct {
    pub sku: String,
    pub name: String,
    /// Decimal amount in the store currency, e.g. `29.90` or `"29.90"`.
    pub price: Decimal,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub delivery_url: Option<String>,
}

impl UpsertProduct {
    pub fn validate(&self) -> Result<()> {
        if self.sku.trim().is_empty() {
            return Err(AppError::Validation(msg::SKU_EMPTY.into()));
        }
        if self.name.trim().is_empty() {
            return Err(AppError::Validation(msg::NAME_EMPTY.into()));
        }
        money::decimal_to_cents(self.price)?;
        Ok(())
    }

    /// Build the product row. Missing description/category fall back to defaults.
    pub fn into_product(self) -> Result<Product> {
        self.validate()?;
        Ok(Product {
            sku: self.sku.trim().to_string(),
            name: self.name.trim().to_string(),
            price_cents: money::decimal_to_cents(self.price)?,
            description: self.description.unwrap_or_default(),
            category: self
                .category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            delivery_url: self.delivery_url.filter(|u| !u.trim().is_empty()),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SetDeliveryUrl {
    pub delivery_url: String,
}

#[derive(Debug, Deserialize)]
pub struct PostProductCard {
    pub channel_id: String,
}
