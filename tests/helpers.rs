use chrono::{Duration, NaiveDateTime, Utc};
use farmlink_backend::models::*;
use farmlink_backend::repositories::MarketPriceRepository;
use farmlink_backend::services::{MarketService, SubscriptionService};
use farmlink_backend::sms_client::TwilioClient;
use farmlink_backend::AppState;
use std::sync::Arc;

/// Teff varieties tracked by the sample fixtures
#[allow(dead_code)]
pub const TEFF_VARIETIES: [&str; 3] = ["Magna (White)", "Mixed", "Sergegna (Red)"];

/// Base price per variety, aligned with TEFF_VARIETIES
#[allow(dead_code)]
pub const BASE_PRICES: [i64; 3] = [6800, 5950, 5300];

/// Fully wired application for tests, with a mock SMS client
pub struct TestApp {
    pub state: Arc<AppState>,
    pub market_service: Arc<MarketService>,
    pub subscription_service: Arc<SubscriptionService>,
    pub sms_client: Arc<TwilioClient>,
}

impl TestApp {
    pub fn new() -> Self {
        let state = Arc::new(AppState::new());
        let sms_client = Arc::new(TwilioClient::mock());
        let market_service = Arc::new(MarketService::new(state.price_repo.clone()));
        let subscription_service = Arc::new(SubscriptionService::new(
            state.subscription_repo.clone(),
            sms_client.clone(),
            market_service.clone(),
        ));

        Self {
            state,
            market_service,
            subscription_service,
            sms_client,
        }
    }
}

/// Build an insert payload pinned to an explicit timestamp
#[allow(dead_code)]
pub fn price_at(variety: &str, price: i64, recorded_at: NaiveDateTime) -> NewMarketPrice {
    NewMarketPrice {
        market: "Addis Ababa".to_string(),
        product: "teff".to_string(),
        variety: variety.to_string(),
        price,
        unit: None,
        source: Some("Ethiopian Grain Trade Enterprise".to_string()),
        recorded_at: Some(recorded_at),
    }
}

/// Seed a week of daily observations per variety plus a current one.
///
/// Variation is a fixed function of the day offset, so the derived
/// day/week changes are exact: for each variety the day-1 price is
/// `base - 90` and the day-7 price is `base - 30`.
#[allow(dead_code)]
pub fn seed_market_data(repo: &MarketPriceRepository) {
    let now = Utc::now().naive_utc();

    for (variety, base) in TEFF_VARIETIES.iter().zip(BASE_PRICES) {
        for days_ago in (1..=7).rev() {
            let variation = -100 + days_ago * 10;
            repo.record(price_at(
                variety,
                base + variation,
                now - Duration::days(days_ago),
            ))
            .expect("failed to seed price history");
        }

        repo.record(price_at(variety, base, now))
            .expect("failed to seed current price");
    }
}
