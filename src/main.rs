//! FarmLink Backend Service
//!
//! Main entry point for the FarmLink produce marketplace backend.
//! This service provides:
//! - REST API for market prices, products, users, and SMS subscriptions
//! - SMS gateway integration for alerts and inbound commands
//! - Background task broadcasting price digests to subscribers

use farmlink_backend::config::AppConfig;
use farmlink_backend::error::{AppError, AppResult};
use farmlink_backend::http_service::{self, ApiContext};
use farmlink_backend::services::{MarketService, PriceAlerter, SubscriptionService};
use farmlink_backend::sms_client::TwilioClient;
use farmlink_backend::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load environment variables first
    dotenv::dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        AppError::Config(e)
    })?;

    // Initialize tracing/logging with config
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "farmlink_backend={},axum=info,reqwest=warn",
                    config.log_level
                )
                .into()
            }),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║           FarmLink Backend Service Starting               ║");
    info!("╚══════════════════════════════════════════════════════════╝");
    info!("Environment: {}", config.environment);
    info!("Log level: {}", config.log_level);
    info!("HTTP port: {}", config.http_port);
    info!("Price source: {}", config.market.price_source);

    // =========================================================================
    // CORE SERVICES INITIALIZATION
    // =========================================================================
    info!("Initializing core services...");

    // Initialize application state with repositories
    let app_state = Arc::new(AppState::new());
    info!("✓ Application state initialized with in-memory repositories");

    // Initialize SMS client (mock mode when credentials are absent)
    let sms_client = Arc::new(TwilioClient::from_env());
    if sms_client.is_mock() {
        info!("✓ SMS client initialized (mock mode)");
    } else {
        info!("✓ SMS client initialized");
    }

    // Initialize services
    let market_service = Arc::new(MarketService::new(app_state.price_repo.clone()));
    info!("✓ Market service initialized");

    let subscription_service = Arc::new(SubscriptionService::new(
        app_state.subscription_repo.clone(),
        sms_client.clone(),
        market_service.clone(),
    ));
    info!("✓ Subscription service initialized");

    // =========================================================================
    // BACKGROUND TASKS
    // =========================================================================

    let alerter_handle = if config.alerts.enabled {
        info!("Starting background tasks...");

        let alerter = PriceAlerter::new(
            market_service.clone(),
            app_state.subscription_repo.clone(),
            sms_client.clone(),
        )
        .with_poll_interval(config.alerts.poll_interval());

        let handle = tokio::spawn(async move {
            alerter.start().await;
        });
        info!(
            "✓ Price alerter background task started ({}s interval)",
            config.alerts.poll_interval_secs
        );
        Some(handle)
    } else {
        warn!("ALERTS_ENABLED=false - price alerter not started");
        None
    };

    // =========================================================================
    // START SERVER
    // =========================================================================

    let http_addr: SocketAddr = format!("0.0.0.0:{}", config.http_port)
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid HTTP address: {}", e)))?;

    info!("Starting HTTP server on {}...", http_addr);

    let ctx = ApiContext {
        market_service,
        subscription_service,
        user_repo: app_state.user_repo.clone(),
        product_repo: app_state.product_repo.clone(),
        sms_client,
        market_config: config.market.clone(),
    };

    let listener = TcpListener::bind(http_addr)
        .await
        .map_err(|e| AppError::Message(format!("Failed to bind HTTP server: {}", e)))?;

    let app = http_service::router(ctx);
    let http_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("HTTP server error: {}", e);
        }
    });

    info!("✓ HTTP server started on {}", http_addr);

    // =========================================================================
    // READY
    // =========================================================================
    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║           FarmLink Backend Service Ready!                 ║");
    info!("╠══════════════════════════════════════════════════════════╣");
    info!("║  REST API:     0.0.0.0:{}                               ║", config.http_port);
    info!("║  Environment:  {}                                    ║", config.environment);
    info!("╚══════════════════════════════════════════════════════════╝");
    info!("Press Ctrl+C to shutdown gracefully");

    // =========================================================================
    // SHUTDOWN HANDLING
    // =========================================================================
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, shutting down gracefully...");
        }
        _ = http_handle => {
            error!("HTTP server exited unexpectedly");
        }
        _ = async {
            if let Some(handle) = alerter_handle {
                handle.await.ok();
            } else {
                // Never completes if the alerter is not running
                futures::future::pending::<()>().await;
            }
        } => {
            error!("Price alerter task exited unexpectedly");
        }
    }

    info!("FarmLink backend service shutdown complete");
    Ok(())
}
