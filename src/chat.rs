//! Chat platform gateway (Discord REST API).
//!
//! Used for buyer DMs, the order log channel and product cards. Runs in a
//! disabled mode when no bot token is configured: sends are logged and skipped.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{Order, Product};
use crate::money::format_brl;

pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

const COLOR_INFO: u32 = 0x5865F2;
const COLOR_PAID: u32 = 0x2ECC71;
const COLOR_REJECTED: u32 = 0xE74C3C;

/// Result of attempting a chat send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatSendResult {
    Sent,
    /// No bot token configured
    Disabled,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EmbedImage {
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Embed {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedImage>,
}

impl Embed {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(EmbedImage { url: url.into() });
        self
    }
}

#[derive(Debug, Serialize)]
struct CreateDmRequest<'a> {
    recipient_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChannelResponse {
    id: String,
}

#[derive(Debug, Serialize)]
struct CreateMessageRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "<[Embed]>::is_empty")]
    embeds: &'a [Embed],
}

#[derive(Clone)]
pub struct ChatGateway {
    bot_token: Option<String>,
    api_base: String,
    http_client: Client,
}

impl ChatGateway {
    pub fn new(bot_token: Option<String>, api_base: &str, timeout: Duration) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build chat HTTP client with timeout: {}", e);
                Client::new()
            });
        Self {
            bot_token: bot_token.filter(|t| !t.trim().is_empty()),
            api_base: api_base.trim_end_matches('/').to_string(),
            http_client,
        }
    }

    /// Gateway that never sends anything.
    pub fn disabled() -> Self {
        Self::new(None, DEFAULT_API_BASE, Duration::from_secs(10))
    }

    pub fn is_enabled(&self) -> bool {
        self.bot_token.is_some()
    }

    /// Open (or reuse) the DM channel with `user_id` and send `content`.
    pub async fn send_direct_message(&self, user_id: &str, content: &str) -> Result<ChatSendResult> {
        let Some(token) = self.bot_token.as_deref() else {
            tracing::debug!(user_id = %user_id, "Chat gateway disabled, skipping direct message");
            return Ok(ChatSendResult::Disabled);
        };

        let channel: ChannelResponse = self
            .post_json(
                token,
                "/users/@me/channels",
                &CreateDmRequest {
                    recipient_id: user_id,
                },
            )
            .await?;

        self.create_message(token, &channel.id, Some(content), &[])
            .await?;
        tracing::info!(user_id = %user_id, "Direct message sent");
        Ok(ChatSendResult::Sent)
    }

    pub async fn post_embed(&self, channel_id: &str, embed: &Embed) -> Result<ChatSendResult> {
        let Some(token) = self.bot_token.as_deref() else {
            tracing::debug!(channel_id = %channel_id, title = %embed.title, "Chat gateway disabled, skipping embed");
            return Ok(ChatSendResult::Disabled);
        };

        self.create_message(token, channel_id, None, std::slice::from_ref(embed))
            .await?;
        tracing::debug!(channel_id = %channel_id, title = %embed.title, "Embed posted");
        Ok(ChatSendResult::Sent)
    }

    async fn create_message(
        &self,
        token: &str,
        channel_id: &str,
        content: Option<&str>,
        embeds: &[Embed],
    ) -> Result<()> {
        let _: serde_json::Value = self
            .post_json(
                token,
                &format!("/channels/{}/messages", channel_id),
                &CreateMessageRequest { content, embeds },
            )
            .await?;
        Ok(())
    }

    async fn post_json<B, R>(&self, token: &str, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: for<'de> Deserialize<'de>,
    {
        let response = self
            .http_client
            .post(format!("{}{}", self.api_base, path))
            .header(reqwest::header::AUTHORIZATION, format!("Bot {}", token))
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Chat API error: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Chat API error ({}): {}",
                status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to parse chat API response: {}", e)))
    }
}

// ============ Message builders ============

/// DM sent to the buyer once payment is confirmed.
pub fn payment_confirmed_message(order_id: i64) -> String {
    format!(
        "✅ Olá! Seu pagamento do Pedido #{} foi confirmado.\n\
         Nosso time vai entregar o produto diretamente no seu canal de carrinho no Discord.\n\
         Por favor, aguarde 😊",
        order_id
    )
}

/// Order log entry posted after a processor notification.
pub fn order_update_embed(order: &Order, items_text: &str) -> Embed {
    let color = match order.status {
        crate::models::OrderStatus::Paid => COLOR_PAID,
        crate::models::OrderStatus::PaymentRejected => COLOR_REJECTED,
        _ => COLOR_INFO,
    };

    let embed = Embed::new("📦 Atualização de Pedido")
        .description(format!("ID: #{}", order.id))
        .color(color)
        .field("Cliente ID", order.user_id.clone(), true)
        .field("Status", order.status.as_str(), true)
        .field("Itens", items_text, false)
        .field("Total", format_brl(order.total_cents), true);

    match order.payment_link.as_deref() {
        Some(link) => embed.field("Pagamento", link, false),
        None => embed,
    }
}

/// Order log entry posted right after checkout.
pub fn new_order_embed(order: &Order) -> Embed {
    Embed::new("📝 Novo Pedido")
        .description(format!("Pedido #{}", order.id))
        .color(COLOR_INFO)
        .field("Cliente", format!("<@{}>", order.user_id), true)
        .field("Total", format_brl(order.total_cents), true)
        .field("Status", order.status.as_str(), true)
}

/// Product card for a sales channel.
pub fn product_card_embed(product: &Product, thumbnail_url: Option<&str>) -> Embed {
    let embed = Embed::new(product.name.clone())
        .description(product.description.clone())
        .color(COLOR_INFO)
        .field("Preço", format_brl(product.price_cents), true);

    match thumbnail_url {
        Some(url) => embed.thumbnail(url),
        None => embed,
    }
}
