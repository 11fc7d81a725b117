use std::time::Duration;

use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

pub const DEFAULT_API_BASE: &str = "https://api.mercadopago.com";

#[derive(Debug, Serialize)]
pub struct PreferenceItem<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub quantity: u32,
    pub currency_id: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}

/// Checkout preference request body.
#[derive(Debug, Serialize)]
pub struct PreferenceRequest<'a> {
    pub items: Vec<PreferenceItem<'a>>,
    pub external_reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_url: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct PreferenceResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub init_point: Option<String>,
    #[serde(default)]
    pub sandbox_init_point: Option<String>,
}

impl PreferenceResponse {
    /// Production link first, then sandbox.
    pub fn checkout_url(self) -> Option<String> {
        self.init_point
            .filter(|u| !u.is_empty())
            .or(self.sandbox_init_point.filter(|u| !u.is_empty()))
    }
}

#[derive(Debug, Clone)]
pub struct MercadoPagoClient {
    client: Client,
    access_token: String,
    api_base: String,
    currency: String,
}

impl MercadoPagoClient {
    pub fn new(
        access_token: String,
        api_base: &str,
        currency: &str,
        timeout: Duration,
    ) -> std::result::Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            access_token,
            api_base: api_base.trim_end_matches('/').to_string(),
            currency: currency.to_string(),
        })
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Create a single-item checkout preference for an order.
    pub async fn create_preference(
        &self,
        request: &PreferenceRequest<'_>,
    ) -> Result<PreferenceResponse> {
        let response = self
            .client
            .post(format!("{}/checkout/preferences", self.api_base))
            .bearer_auth(&self.access_token)
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Mercado Pago API error: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Mercado Pago API error ({}): {}",
                status, error_text
            )));
        }

        response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse Mercado Pago response: {}", e))
        })
    }
}
