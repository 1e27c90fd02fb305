use crate::error::AppResult;
use crate::market::{compute_changes, CurrentPrice};
use crate::models::{MarketPrice, NewMarketPrice};
use crate::repositories::MarketPriceRepository;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::info;

/// Week-over-week move (in percent) beyond which an insight is emitted
const INSIGHT_THRESHOLD_PCT: f64 = 5.0;

/// One calendar day of history: the day's last recorded price per variety
#[derive(Debug, Clone, Serialize)]
pub struct HistoryRow {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub prices: HashMap<String, i64>,
}

/// A qualitative market signal derived from computed price changes
#[derive(Debug, Clone, Serialize)]
pub struct MarketInsight {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
}

/// Service for market price queries and derived views
pub struct MarketService {
    price_repo: Arc<MarketPriceRepository>,
}

impl MarketService {
    pub fn new(price_repo: Arc<MarketPriceRepository>) -> Self {
        Self { price_repo }
    }

    /// Record a new price observation
    pub fn record_price(&self, input: NewMarketPrice) -> AppResult<MarketPrice> {
        let price = self.price_repo.record(input)?;
        info!(
            "Recorded price: {} ({}) at {} = {} ETB/{}",
            price.product, price.variety, price.market, price.price, price.unit
        );
        Ok(price)
    }

    /// Current price view: one entry per distinct variety, in the order
    /// varieties were first recorded, each with day/week changes
    pub fn current_prices(&self) -> AppResult<Vec<CurrentPrice>> {
        let observations = self.price_repo.find_all()?;

        // Group by exact variety string, preserving first-seen order
        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Vec<MarketPrice>> = HashMap::new();
        for observation in observations {
            if !groups.contains_key(&observation.variety) {
                order.push(observation.variety.clone());
            }
            groups
                .entry(observation.variety.clone())
                .or_default()
                .push(observation);
        }

        let mut views = Vec::with_capacity(order.len());
        for variety in &order {
            // Groups are non-empty by construction
            if let Some(view) = compute_changes(&groups[variety]) {
                views.push(view);
            }
        }
        Ok(views)
    }

    /// Timestamp of the single most recent observation across all varieties
    pub fn last_updated(&self) -> AppResult<Option<NaiveDateTime>> {
        let observations = self.price_repo.find_all()?;
        Ok(observations
            .iter()
            .max_by_key(|p| (p.recorded_at, p.id))
            .map(|p| p.recorded_at))
    }

    /// Price history over the past `window_days`, bucketed by calendar day
    ///
    /// Each row carries the last recorded price per variety for that day.
    /// Only days with at least one observation appear, oldest first.
    pub fn history(&self, window_days: i64) -> AppResult<Vec<HistoryRow>> {
        let cutoff = chrono::Utc::now().naive_utc() - Duration::days(window_days);
        let observations = self.price_repo.find_since(cutoff)?;

        let mut buckets: BTreeMap<NaiveDate, HashMap<String, MarketPrice>> = BTreeMap::new();
        for observation in observations {
            let day = buckets.entry(observation.recorded_at.date()).or_default();
            let replaces_existing = match day.get(&observation.variety) {
                Some(existing) => {
                    (observation.recorded_at, observation.id) > (existing.recorded_at, existing.id)
                }
                None => true,
            };
            if replaces_existing {
                day.insert(observation.variety.clone(), observation);
            }
        }

        Ok(buckets
            .into_iter()
            .map(|(date, day)| HistoryRow {
                date,
                prices: day.into_iter().map(|(v, p)| (v, p.price)).collect(),
            })
            .collect())
    }

    /// Market insights derived from the computed week-over-week changes
    pub fn insights(&self) -> AppResult<Vec<MarketInsight>> {
        let prices = self.current_prices()?;
        let mut insights = Vec::new();

        for view in &prices {
            let variety = &view.observation.variety;
            if view.week_change <= -INSIGHT_THRESHOLD_PCT {
                insights.push(MarketInsight {
                    kind: "success".to_string(),
                    title: "Buying Opportunity".to_string(),
                    description: format!(
                        "{} prices are down {:.1}% over the past week and may continue to soften as supply enters the market.",
                        variety,
                        view.week_change.abs()
                    ),
                });
            } else if view.week_change >= INSIGHT_THRESHOLD_PCT {
                insights.push(MarketInsight {
                    kind: "warning".to_string(),
                    title: "Supply Pressure".to_string(),
                    description: format!(
                        "{} prices are up {:.1}% over the past week. Buyers may face higher prices in the coming days.",
                        variety, view.week_change
                    ),
                });
            }
        }

        if insights.is_empty() && !prices.is_empty() {
            insights.push(MarketInsight {
                kind: "info".to_string(),
                title: "Stable Market".to_string(),
                description: "Prices have held within a narrow band over the past week across tracked varieties.".to_string(),
            });
        }

        Ok(insights)
    }

    /// Human-readable price digest for SMS replies and alert broadcasts
    ///
    /// `None` when nothing has been recorded yet.
    pub fn digest(&self) -> AppResult<Option<String>> {
        let prices = self.current_prices()?;
        let Some(first) = prices.first() else {
            return Ok(None);
        };

        let mut lines = vec![format!(
            "Current {} prices in {}:",
            first.observation.product, first.observation.market
        )];
        for view in &prices {
            let mut line = format!(
                "{}: {} ETB/{}",
                view.observation.variety, view.observation.price, view.observation.unit
            );
            if view.day_change != 0.0 {
                line.push_str(&format!(" ({:+.1}% today)", view.day_change));
            }
            lines.push(line);
        }

        Ok(Some(lines.join("\n")))
    }
}
