use crate::error::{StoreError, StoreResult};
use crate::models::{MarketPrice, NewMarketPrice, DEFAULT_UNIT};
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::sync::RwLock;

struct Inner {
    rows: HashMap<i64, MarketPrice>,
    next_id: i64,
}

/// Repository for market price observations
///
/// Append-only: observations are recorded once and never mutated or
/// deleted. Reads copy a point-in-time snapshot out of the lock, so a
/// reader never sees a partially applied write.
pub struct MarketPriceRepository {
    inner: RwLock<Inner>,
}

impl MarketPriceRepository {
    /// Create a new, empty MarketPriceRepository
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                rows: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Record a new price observation
    ///
    /// Fails fast on invalid input and leaves the store unchanged.
    /// `unit` defaults to [`DEFAULT_UNIT`] and `recorded_at` to now.
    pub fn record(&self, input: NewMarketPrice) -> StoreResult<MarketPrice> {
        if input.price <= 0 {
            return Err(StoreError::InvalidInput(format!(
                "price must be positive, got {}",
                input.price
            )));
        }
        if input.market.trim().is_empty() {
            return Err(StoreError::InvalidInput("market is required".to_string()));
        }
        if input.product.trim().is_empty() {
            return Err(StoreError::InvalidInput("product is required".to_string()));
        }
        if input.variety.trim().is_empty() {
            return Err(StoreError::InvalidInput("variety is required".to_string()));
        }

        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::LockPoisoned("record"))?;

        let id = inner.next_id;
        inner.next_id += 1;

        let price = MarketPrice {
            id,
            market: input.market,
            product: input.product,
            variety: input.variety,
            price: input.price,
            unit: input.unit.unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            source: input.source,
            recorded_at: input
                .recorded_at
                .unwrap_or_else(|| chrono::Utc::now().naive_utc()),
        };

        inner.rows.insert(id, price.clone());
        Ok(price)
    }

    /// Snapshot of all observations in insertion order (ascending id)
    pub fn find_all(&self) -> StoreResult<Vec<MarketPrice>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::LockPoisoned("find_all"))?;

        let mut rows: Vec<MarketPrice> = inner.rows.values().cloned().collect();
        rows.sort_by_key(|p| p.id);
        Ok(rows)
    }

    /// Snapshot of observations recorded at or after `cutoff`,
    /// in insertion order
    pub fn find_since(&self, cutoff: NaiveDateTime) -> StoreResult<Vec<MarketPrice>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::LockPoisoned("find_since"))?;

        let mut rows: Vec<MarketPrice> = inner
            .rows
            .values()
            .filter(|p| p.recorded_at >= cutoff)
            .cloned()
            .collect();
        rows.sort_by_key(|p| p.id);
        Ok(rows)
    }

    /// Number of stored observations
    pub fn count(&self) -> StoreResult<usize> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::LockPoisoned("count"))?;
        Ok(inner.rows.len())
    }
}

impl Default for MarketPriceRepository {
    fn default() -> Self {
        Self::new()
    }
}
