//! FarmLink Backend Library
//!
//! This module exposes the backend components for use by tests and other consumers.

pub mod config;
pub mod error;
pub mod http_service;
pub mod market;
pub mod models;
pub mod repositories;
pub mod services;
pub mod sms_client;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};

use repositories::*;
use std::sync::Arc;

/// Application state containing all repositories
///
/// Constructed once at process start and passed to the services and
/// handlers that need it; the repositories are volatile and live for
/// the process lifetime only.
pub struct AppState {
    pub user_repo: Arc<UserRepository>,
    pub product_repo: Arc<ProductRepository>,
    pub price_repo: Arc<MarketPriceRepository>,
    pub subscription_repo: Arc<SmsSubscriptionRepository>,
}

impl AppState {
    /// Create a new AppState with initialized repositories
    pub fn new() -> Self {
        Self {
            user_repo: Arc::new(UserRepository::new()),
            product_repo: Arc::new(ProductRepository::new()),
            price_repo: Arc::new(MarketPriceRepository::new()),
            subscription_repo: Arc::new(SmsSubscriptionRepository::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
