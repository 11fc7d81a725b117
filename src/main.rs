use std::sync::Arc;

use axum::Router;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vitrine::chat::ChatGateway;
use vitrine::config::{Config, DEFAULT_WEBHOOK_TOKEN};
use vitrine::db::{AppState, create_pool, init_db, migrations};
use vitrine::handlers;
use vitrine::payments::PaymentGateway;
use vitrine::seed;

#[derive(Parser, Debug)]
#[command(name = "vitrine")]
#[command(about = "Digital goods storefront for a chat platform")]
struct Cli {
    /// Do not create the default product when the catalog is empty
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vitrine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();

    if config.webhook_verify_token == DEFAULT_WEBHOOK_TOKEN {
        tracing::warn!("WEBHOOK_VERIFY_TOKEN is the default value, set a real secret");
    }
    if config.admin_api_key.is_none() {
        tracing::warn!("ADMIN_API_KEY not set, admin endpoints will reject every request");
    }

    let db_pool = create_pool(&config.database_path).expect("Failed to create database pool");

    // Migrate, then create anything missing
    {
        let mut conn = db_pool.get().expect("Failed to get connection");
        migrations::run_migrations(&mut conn, &config.database_path)
            .expect("Failed to run database migrations");
        init_db(&conn).expect("Failed to initialize database");

        if !cli.no_seed {
            seed::seed_catalog(&conn, &config.featured_delivery_url)
                .expect("Failed to seed catalog");
        }
    }

    let payments = PaymentGateway::new(
        config.mp_access_token.clone(),
        &config.mp_api_base,
        &config.currency,
        config.http_timeout,
    );
    let chat = ChatGateway::new(
        config.discord_bot_token.clone(),
        &config.discord_api_base,
        config.http_timeout,
    );
    if !chat.is_enabled() {
        tracing::info!("DISCORD_BOT_TOKEN not set, chat notifications disabled");
    }

    let state = AppState {
        db: db_pool,
        admin_api_key: config.admin_api_key.clone(),
        webhook_token: config.webhook_verify_token.clone(),
        notification_url: config.notification_url(),
        order_log_channel_id: config.order_log_channel_id.clone(),
        featured_image_url: config.featured_image_url.clone(),
        payments: Arc::new(payments),
        chat: Arc::new(chat),
    };

    let app = Router::new()
        .merge(handlers::router(state.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Vitrine listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}
