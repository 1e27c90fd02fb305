pub mod market_service;
pub mod price_alerter;
pub mod subscription_service;

// Re-export all services for convenient access
pub use market_service::{HistoryRow, MarketInsight, MarketService};
pub use price_alerter::PriceAlerter;
pub use subscription_service::SubscriptionService;
