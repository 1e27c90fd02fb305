//! Domain models for the FarmLink backend.
//!
//! This module contains all stored models representing the core entities
//! of the produce marketplace platform.

pub mod market_price;
pub mod product;
pub mod sms_subscription;
pub mod user;

// Re-export all models for convenient access
pub use market_price::{MarketPrice, NewMarketPrice, DEFAULT_UNIT};
pub use product::{NewProduct, Product, ProductUpdate};
pub use sms_subscription::{AlertFrequency, NewSmsSubscription, SmsSubscription};
pub use user::{NewUser, User, UserType};
