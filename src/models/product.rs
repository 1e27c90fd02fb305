use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Product model representing a marketplace listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub title: String,
    /// Listing type label (e.g. "white", "mixed", "red", "organic")
    pub kind: String,
    pub quality: String,
    pub quantity: i64,
    /// Asking price in the smallest currency unit
    pub price: i64,
    pub location: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub seller_id: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insert payload for a new product listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub title: String,
    pub kind: String,
    pub quality: String,
    pub quantity: i64,
    pub price: i64,
    pub location: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub seller_id: Option<i64>,
}

/// Partial update for an existing product listing
///
/// Only fields that are `Some` are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub kind: Option<String>,
    pub quality: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<i64>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl ProductUpdate {
    /// Check whether the update carries any field at all
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.kind.is_none()
            && self.quality.is_none()
            && self.quantity.is_none()
            && self.price.is_none()
            && self.location.is_none()
            && self.description.is_none()
            && self.image.is_none()
    }
}
