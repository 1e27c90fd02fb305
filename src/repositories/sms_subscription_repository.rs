use crate::error::{StoreError, StoreResult};
use crate::models::{AlertFrequency, NewSmsSubscription, SmsSubscription};
use std::collections::HashMap;
use std::sync::RwLock;

struct Inner {
    rows: HashMap<i64, SmsSubscription>,
    next_id: i64,
}

/// Repository for SMS price alert subscriptions
pub struct SmsSubscriptionRepository {
    inner: RwLock<Inner>,
}

impl SmsSubscriptionRepository {
    /// Create a new, empty SmsSubscriptionRepository
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                rows: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Insert a new subscription (active by default)
    pub fn create(&self, input: NewSmsSubscription) -> StoreResult<SmsSubscription> {
        if input.phone_number.trim().is_empty() {
            return Err(StoreError::InvalidInput(
                "phone number is required".to_string(),
            ));
        }
        if input.market_id.trim().is_empty() {
            return Err(StoreError::InvalidInput("market is required".to_string()));
        }
        if input.product_id.trim().is_empty() {
            return Err(StoreError::InvalidInput("product is required".to_string()));
        }

        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::LockPoisoned("create"))?;

        let id = inner.next_id;
        inner.next_id += 1;
        let now = chrono::Utc::now().naive_utc();

        let subscription = SmsSubscription {
            id,
            user_id: input.user_id,
            phone_number: input.phone_number,
            market_id: input.market_id,
            product_id: input.product_id,
            frequency: input
                .frequency
                .unwrap_or(AlertFrequency::Daily)
                .as_str()
                .to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        inner.rows.insert(id, subscription.clone());
        Ok(subscription)
    }

    /// Snapshot of all active subscriptions in insertion order
    pub fn find_active(&self) -> StoreResult<Vec<SmsSubscription>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::LockPoisoned("find_active"))?;

        let mut rows: Vec<SmsSubscription> = inner
            .rows
            .values()
            .filter(|s| s.is_active)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.id);
        Ok(rows)
    }

    /// Check whether any active subscription exists for a phone number
    pub fn is_subscribed(&self, phone_number: &str) -> StoreResult<bool> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::LockPoisoned("is_subscribed"))?;
        Ok(inner
            .rows
            .values()
            .any(|s| s.phone_number == phone_number && s.is_active))
    }

    /// Deactivate all subscriptions for a phone number
    ///
    /// Returns the number of subscriptions that changed state.
    pub fn deactivate_by_phone(&self, phone_number: &str) -> StoreResult<usize> {
        self.set_active_by_phone(phone_number, false, "deactivate_by_phone")
    }

    /// Reactivate all subscriptions for a phone number
    ///
    /// Returns the number of subscriptions that changed state.
    pub fn reactivate_by_phone(&self, phone_number: &str) -> StoreResult<usize> {
        self.set_active_by_phone(phone_number, true, "reactivate_by_phone")
    }

    fn set_active_by_phone(
        &self,
        phone_number: &str,
        is_active: bool,
        op: &'static str,
    ) -> StoreResult<usize> {
        let mut inner = self.inner.write().map_err(|_| StoreError::LockPoisoned(op))?;

        let now = chrono::Utc::now().naive_utc();
        let mut changed = 0;
        for subscription in inner.rows.values_mut() {
            if subscription.phone_number == phone_number && subscription.is_active != is_active {
                subscription.is_active = is_active;
                subscription.updated_at = now;
                changed += 1;
            }
        }
        Ok(changed)
    }
}

impl Default for SmsSubscriptionRepository {
    fn default() -> Self {
        Self::new()
    }
}
