use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Default unit of measure for recorded prices
pub const DEFAULT_UNIT: &str = "quintal";

/// Market price model representing one immutable price observation:
/// a product variety's price at a market at a point in time.
///
/// Observations are append-only. They are never mutated or deleted, and
/// `(market, product, variety, recorded_at)` is not required to be unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketPrice {
    pub id: i64,
    pub market: String,
    pub product: String,
    pub variety: String,
    /// Price in the smallest currency unit, always > 0
    pub price: i64,
    pub unit: String,
    pub source: Option<String>,
    pub recorded_at: NaiveDateTime,
}

/// Insert payload for a new price observation
///
/// `unit` defaults to [`DEFAULT_UNIT`] and `recorded_at` to the current
/// time when not supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMarketPrice {
    pub market: String,
    pub product: String,
    pub variety: String,
    pub price: i64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub recorded_at: Option<NaiveDateTime>,
}
