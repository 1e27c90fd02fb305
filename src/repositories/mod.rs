pub mod market_price_repository;
pub mod product_repository;
pub mod sms_subscription_repository;
pub mod user_repository;

// Re-export all repositories for convenient access
pub use market_price_repository::MarketPriceRepository;
pub use product_repository::ProductRepository;
pub use sms_subscription_repository::SmsSubscriptionRepository;
pub use user_repository::UserRepository;
