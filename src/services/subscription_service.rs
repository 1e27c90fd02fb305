use crate::error::AppResult;
use crate::models::{NewSmsSubscription, SmsSubscription};
use crate::repositories::SmsSubscriptionRepository;
use crate::services::MarketService;
use crate::sms_client::TwilioClient;
use std::sync::Arc;
use tracing::info;

/// Service for managing SMS price alert subscriptions and inbound
/// SMS commands
pub struct SubscriptionService {
    subscription_repo: Arc<SmsSubscriptionRepository>,
    sms_client: Arc<TwilioClient>,
    market_service: Arc<MarketService>,
}

impl SubscriptionService {
    pub fn new(
        subscription_repo: Arc<SmsSubscriptionRepository>,
        sms_client: Arc<TwilioClient>,
        market_service: Arc<MarketService>,
    ) -> Self {
        Self {
            subscription_repo,
            sms_client,
            market_service,
        }
    }

    /// Create a subscription and send a confirmation SMS
    pub async fn subscribe(&self, input: NewSmsSubscription) -> AppResult<SmsSubscription> {
        let subscription = self.subscription_repo.create(input)?;
        info!(
            "Created SMS subscription {} for {} ({} / {})",
            subscription.id,
            subscription.phone_number,
            subscription.product_id,
            subscription.market_id
        );

        let confirmation = format!(
            "You are now subscribed to {} price alerts for {} in {}. Reply STOP to unsubscribe.",
            subscription.frequency, subscription.product_id, subscription.market_id
        );
        self.sms_client
            .send_sms(&subscription.phone_number, &confirmation)
            .await?;

        Ok(subscription)
    }

    /// Deactivate all subscriptions for a phone number and confirm by SMS
    ///
    /// Returns the number of subscriptions that changed state.
    pub async fn unsubscribe(&self, phone_number: &str) -> AppResult<usize> {
        let changed = self.subscription_repo.deactivate_by_phone(phone_number)?;
        info!(
            "Deactivated {} subscription(s) for {}",
            changed, phone_number
        );

        self.sms_client
            .send_sms(
                phone_number,
                "You have been unsubscribed from all price alerts. Reply START to resubscribe.",
            )
            .await?;

        Ok(changed)
    }

    /// Check whether a phone number has any active subscription
    pub fn is_subscribed(&self, phone_number: &str) -> AppResult<bool> {
        Ok(self.subscription_repo.is_subscribed(phone_number)?)
    }

    /// Handle an inbound SMS command and produce the reply text
    ///
    /// Commands are case-insensitive: PRICE/PRICES, STOP, START, HELP.
    /// STOP and START update the sender's subscriptions; PRICE replies
    /// with the digest built from recorded observations.
    pub async fn handle_inbound(&self, from: &str, body: &str) -> AppResult<String> {
        let command = body.trim().to_lowercase();

        let reply = match command.as_str() {
            "price" | "prices" => self
                .market_service
                .digest()?
                .unwrap_or_else(|| "No prices have been recorded yet. Please check back later.".to_string()),
            "stop" => {
                self.subscription_repo.deactivate_by_phone(from)?;
                "You have been unsubscribed from all FarmLink alerts. Reply START to resubscribe."
                    .to_string()
            }
            "start" => {
                self.subscription_repo.reactivate_by_phone(from)?;
                "You have been resubscribed to FarmLink alerts. Reply STOP to unsubscribe at any time."
                    .to_string()
            }
            "help" => "FarmLink SMS commands:\n\
                       PRICE - Get current market prices\n\
                       STOP - Unsubscribe from alerts\n\
                       START - Resubscribe to alerts\n\
                       HELP - See this message"
                .to_string(),
            _ => "Command not recognized. Reply HELP for a list of commands.".to_string(),
        };

        info!("SMS received from {}: \"{}\"", from, body.trim());
        Ok(reply)
    }
}
