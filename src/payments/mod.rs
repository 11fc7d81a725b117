//! Payment link issuance.
//!
//! With an access token the issuer creates Mercado Pago checkout preferences.
//! Without one it hands out a deterministic placeholder link so the rest of the
//! checkout flow still runs.

mod mercadopago;

pub use mercadopago::*;

use std::time::Duration;

use crate::error::Result;
use crate::models::PaymentLink;
use crate::money;

pub const STUB_LINK_BASE: &str = "https://pagamento.exemplo/ordem";

/// Placeholder link used when no processor is configured.
pub fn stub_link(order_id: i64) -> String {
    format!("{}/{}", STUB_LINK_BASE, order_id)
}

/// What to charge for one order.
#[derive(Debug, Clone)]
pub struct PaymentLinkRequest<'a> {
    pub order_id: i64,
    pub title: &'a str,
    pub description: &'a str,
    pub amount_cents: i64,
    pub notification_url: Option<&'a str>,
}

pub enum PaymentGateway {
    MercadoPago(MercadoPagoClient),
    Stub,
}

impl PaymentGateway {
    /// Falls back to the stub when no token is set or the HTTP client cannot be built.
    pub fn new(
        access_token: Option<String>,
        api_base: &str,
        currency: &str,
        timeout: Duration,
    ) -> Self {
        let Some(token) = access_token.filter(|t| !t.trim().is_empty()) else {
            tracing::info!("MP_ACCESS_TOKEN not set, payment links will be placeholders");
            return Self::Stub;
        };

        match MercadoPagoClient::new(token, api_base, currency, timeout) {
            Ok(client) => Self::MercadoPago(client),
            Err(e) => {
                tracing::warn!("Failed to initialize Mercado Pago client, using placeholder links: {}", e);
                Self::Stub
            }
        }
    }

    pub fn stub() -> Self {
        Self::Stub
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, Self::MercadoPago(_))
    }

    /// Issue a payment link for an order. Mercado Pago links carry the preference id.
    pub async fn issue_link(&self, request: &PaymentLinkRequest<'_>) -> Result<PaymentLink> {
        let client = match self {
            Self::MercadoPago(client) => client,
            Self::Stub => return Ok(PaymentLink::new(stub_link(request.order_id))),
        };

        let preference = PreferenceRequest {
            items: vec![PreferenceItem {
                title: request.title,
                description: request.description,
                quantity: 1,
                currency_id: client.currency(),
                unit_price: money::cents_to_decimal(request.amount_cents),
            }],
            external_reference: request.order_id.to_string(),
            notification_url: request.notification_url,
        };

        let response = client.create_preference(&preference).await?;
        tracing::info!(
            order_id = request.order_id,
            preference_id = ?response.id,
            "Payment preference created"
        );

        let external_ref = response.id.clone();
        let url = response
            .checkout_url()
            .unwrap_or_else(|| stub_link(request.order_id));
        Ok(PaymentLink { url, external_ref })
    }
}
