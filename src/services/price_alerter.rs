use crate::models::SmsSubscription;
use crate::repositories::SmsSubscriptionRepository;
use crate::services::MarketService;
use crate::sms_client::TwilioClient;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tracing::{error, info, warn};

/// Background broadcaster that sends price digests to active SMS
/// subscriptions on their configured cadence
pub struct PriceAlerter {
    market_service: Arc<MarketService>,
    subscription_repo: Arc<SmsSubscriptionRepository>,
    sms_client: Arc<TwilioClient>,
    poll_interval: Duration,
    last_sent: Arc<tokio::sync::RwLock<HashMap<i64, NaiveDateTime>>>,
}

impl PriceAlerter {
    /// Create a new price alerter
    pub fn new(
        market_service: Arc<MarketService>,
        subscription_repo: Arc<SmsSubscriptionRepository>,
        sms_client: Arc<TwilioClient>,
    ) -> Self {
        Self {
            market_service,
            subscription_repo,
            sms_client,
            poll_interval: Duration::from_secs(300), // Default: 5 minutes
            last_sent: Arc::new(tokio::sync::RwLock::new(HashMap::new())),
        }
    }

    /// Set poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Start the broadcast loop
    pub async fn start(self) {
        let mut interval = time::interval(self.poll_interval);
        info!("Price alerter started, polling every {:?}", self.poll_interval);

        loop {
            interval.tick().await;

            if let Err(e) = self.broadcast_due_digests().await {
                error!("Error in price alerter: {:#}", e);
            }
        }
    }

    /// Send the digest to every subscription whose cadence has elapsed
    async fn broadcast_due_digests(&self) -> anyhow::Result<()> {
        let subscriptions = self.subscription_repo.find_active()?;
        if subscriptions.is_empty() {
            return Ok(());
        }

        let Some(digest) = self.market_service.digest()? else {
            // Nothing recorded yet, nothing to broadcast
            return Ok(());
        };

        let now = chrono::Utc::now().naive_utc();
        for subscription in subscriptions {
            if !self.is_due(&subscription, now).await {
                continue;
            }

            match self
                .sms_client
                .send_sms(&subscription.phone_number, &digest)
                .await
            {
                Ok(_) => {
                    self.last_sent.write().await.insert(subscription.id, now);
                }
                Err(e) => {
                    warn!(
                        "Failed to send price digest to {}: {}",
                        subscription.phone_number, e
                    );
                }
            }
        }

        Ok(())
    }

    /// A subscription is due when it has never been sent a digest, or
    /// when its frequency interval has elapsed since the last send
    async fn is_due(&self, subscription: &SmsSubscription, now: NaiveDateTime) -> bool {
        let last_sent = self.last_sent.read().await;
        match last_sent.get(&subscription.id) {
            None => true,
            Some(sent_at) => {
                (now - *sent_at).num_hours() >= subscription.frequency_enum().interval_hours()
            }
        }
    }
}
