use crate::models::MarketPrice;
use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// The latest observation for one variety, decorated with derived
/// day-over-day and week-over-week percentage changes.
///
/// Computed fresh on every query; never stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPrice {
    #[serde(flatten)]
    pub observation: MarketPrice,
    pub day_change: f64,
    pub week_change: f64,
}

/// Compute the current price view for one variety's full history.
///
/// The latest observation is the one with the maximum `recorded_at`;
/// ties are broken by highest id. The day comparator is the most recent
/// earlier observation lying exactly 1 whole day before the latest, the
/// week comparator the most recent one lying 7 whole days before
/// (`[7, 8)` in fractional days). A missing comparator yields a change
/// of 0. Percentages are rounded to one decimal place with
/// round-half-to-even.
///
/// Returns `None` only for an empty history.
pub fn compute_changes(observations: &[MarketPrice]) -> Option<CurrentPrice> {
    // Most recent first; equal timestamps ordered by descending id
    let mut sorted: Vec<&MarketPrice> = observations.iter().collect();
    sorted.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at).then(b.id.cmp(&a.id)));

    let latest = *sorted.first()?;

    let day_change = sorted[1..]
        .iter()
        .find(|p| whole_days_between(latest.recorded_at, p.recorded_at) == 1)
        .map(|p| percent_change(latest.price, p.price))
        .unwrap_or(0.0);

    let week_change = sorted[1..]
        .iter()
        .find(|p| whole_days_between(latest.recorded_at, p.recorded_at) == 7)
        .map(|p| percent_change(latest.price, p.price))
        .unwrap_or(0.0);

    Some(CurrentPrice {
        observation: latest.clone(),
        day_change,
        week_change,
    })
}

/// Whole days elapsed from `earlier` to `latest` (floor of the
/// fractional distance; comparators are never after the latest)
fn whole_days_between(latest: NaiveDateTime, earlier: NaiveDateTime) -> i64 {
    (latest - earlier).num_days()
}

/// `((latest - comparator) / comparator) * 100`, one decimal place,
/// round-half-to-even
fn percent_change(latest: i64, comparator: i64) -> f64 {
    let delta = Decimal::from(latest) - Decimal::from(comparator);
    // comparator prices are > 0 by the store's record-time guard
    let ratio = match delta.checked_div(Decimal::from(comparator)) {
        Some(ratio) => ratio,
        None => return 0.0,
    };
    (ratio * Decimal::ONE_HUNDRED)
        .round_dp(1)
        .to_f64()
        .unwrap_or(0.0)
}
