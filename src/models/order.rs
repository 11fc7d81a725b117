use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use super::cart::CartItems;
use crate::money;

/// Order lifecycle. Stored and exchanged with the Portuguese vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString)]
pub enum OrderStatus {
    #[serde(rename = "pendente")]
    #[strum(serialize = "pendente")]
    Pending,
    #[serde(rename = "aguardando_pagamento")]
    #[strum(serialize = "aguardando_pagamento")]
    AwaitingPayment,
    #[serde(rename = "pago")]
    #[strum(serialize = "pago")]
    Paid,
    #[serde(rename = "pagamento_recusado")]
    #[strum(serialize = "pagamento_recusado")]
    PaymentRejected,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pendente",
            Self::AwaitingPayment => "aguardando_pagamento",
            Self::Paid => "pago",
            Self::PaymentRejected => "pagamento_recusado",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid | Self::PaymentRejected)
    }

    /// Transition table. Self-transitions are allowed so re-notifications are no-ops.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if *self == next {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        matches!(
            (self, next),
            (Self::Pending, Self::AwaitingPayment)
                | (Self::AwaitingPayment, Self::Paid)
                | (Self::AwaitingPayment, Self::PaymentRejected)
        )
    }

    /// Map the payment processor's status vocabulary. Unknown values map to `None`.
    pub fn from_processor_status(status: &str) -> Option<Self> {
        match status {
            "approved" => Some(Self::Paid),
            "rejected" => Some(Self::PaymentRejected),
            "pending" => Some(Self::AwaitingPayment),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub user_id: String,
    /// Snapshot taken at creation; never a live view of the cart.
    pub items: CartItems,
    pub total_cents: i64,
    pub status: OrderStatus,
    pub payment_link: Option<String>,
    pub external_ref: Option<String>,
    pub created_at: i64,
}

impl Order {
    /// One-line admin listing: `#12 • user:42 • pago • R$ 20,00`.
    pub fn display_line(&self) -> String {
        format!(
            "#{} • user:{} • {} • {}",
            self.id,
            self.user_id,
            self.status,
            money::format_brl(self.total_cents)
        )
    }
}

/// Result of a status update: the stored order and the status it had before.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub order: Order,
    pub previous: OrderStatus,
}

impl StatusChange {
    pub fn changed(&self) -> bool {
        self.order.status != self.previous
    }
}

/// Checkout URL for an order, with the processor's reference when it returns one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentLink {
    pub url: String,
    pub external_ref: Option<String>,
}

impl PaymentLink {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            external_ref: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub user_id: String,
    pub items: CartItems,
    pub total_cents: i64,
    pub payment_link: Option<String>,
    pub external_ref: Option<String>,
}
