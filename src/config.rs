use std::env;
use std::time::Duration;

pub const DEFAULT_WEBHOOK_TOKEN: &str = "changeme";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub base_url: String,
    /// Single denomination used for every price and payment preference.
    pub currency: String,
    /// Bearer key for the admin API. Unset means every admin call is rejected.
    pub admin_api_key: Option<String>,
    /// Shared secret expected in the `x-token` header of payment notifications.
    pub webhook_verify_token: String,
    pub mp_access_token: Option<String>,
    pub mp_api_base: String,
    pub discord_bot_token: Option<String>,
    pub discord_api_base: String,
    pub order_log_channel_id: Option<String>,
    pub featured_delivery_url: String,
    pub featured_image_url: Option<String>,
    pub http_timeout: Duration,
}

/// Reads an optional variable, treating empty strings as unset.
fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);

        let base_url = env::var("BASE_URL")
            .unwrap_or_else(|_| format!("http://{}:{}", host, port));

        let http_timeout_secs: u64 = env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(10);

        Self {
            host,
            port,
            database_path: env::var("DATABASE_PATH")
                .or_else(|_| env::var("DB_PATH"))
                .unwrap_or_else(|_| "store.db".to_string()),
            base_url,
            currency: env::var("CURRENCY").unwrap_or_else(|_| "BRL".to_string()),
            admin_api_key: optional_var("ADMIN_API_KEY"),
            webhook_verify_token: env::var("WEBHOOK_VERIFY_TOKEN")
                .unwrap_or_else(|_| DEFAULT_WEBHOOK_TOKEN.to_string()),
            mp_access_token: optional_var("MP_ACCESS_TOKEN"),
            mp_api_base: env::var("MP_API_BASE")
                .unwrap_or_else(|_| crate::payments::DEFAULT_API_BASE.to_string()),
            discord_bot_token: optional_var("DISCORD_BOT_TOKEN"),
            discord_api_base: env::var("DISCORD_API_BASE")
                .unwrap_or_else(|_| crate::chat::DEFAULT_API_BASE.to_string()),
            order_log_channel_id: optional_var("ORDER_LOG_CHANNEL_ID").filter(|v| v != "0"),
            featured_delivery_url: env::var("DELIVERY_URL_8BALL_GUIDE").unwrap_or_else(|_| {
                "https://exemplo.com/downloads/8ball_guide_pro.pdf".to_string()
            }),
            featured_image_url: Some(env::var("PRODUCT_IMAGE_8BALL_GUIDE").unwrap_or_else(
                |_| "https://exemplo.com/imagens/8ball_guide.png".to_string(),
            ))
            .filter(|v| !v.is_empty()),
            http_timeout: Duration::from_secs(http_timeout_secs),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// URL the payment processor should notify, only when reachable from outside.
    pub fn notification_url(&self) -> Option<String> {
        let base = self.base_url.trim_end_matches('/');
        let local = base.contains("://127.0.0.1")
            || base.contains("://localhost")
            || base.contains("://0.0.0.0");
        (!local && base.starts_with("https://")).then(|| format!("{}/webhook/mp", base))
    }
}
