mod helpers;

use chrono::{Duration, Utc};
use farmlink_backend::models::*;
use helpers::*;

/// Unit tests for the current price view

#[test]
fn test_record_then_current_prices_includes_latest() {
    let app = TestApp::new();
    let now = Utc::now().naive_utc();

    app.state
        .price_repo
        .record(price_at("Magna (White)", 6700, now - Duration::days(1)))
        .unwrap();
    let recorded = app
        .market_service
        .record_price(price_at("Magna (White)", 6800, now))
        .unwrap();

    let prices = app.market_service.current_prices().unwrap();
    assert_eq!(prices.len(), 1);
    assert_eq!(prices[0].observation.id, recorded.id);
    assert_eq!(prices[0].observation.price, 6800);
    // 100 / 6700 = 1.4925...% -> 1.5
    assert_eq!(prices[0].day_change, 1.5);
}

#[test]
fn test_record_rejects_non_positive_price() {
    let app = TestApp::new();
    let now = Utc::now().naive_utc();

    assert!(app
        .state
        .price_repo
        .record(price_at("Mixed", 0, now))
        .is_err());
    assert!(app
        .state
        .price_repo
        .record(price_at("Mixed", -50, now))
        .is_err());

    // The failed records must not appear anywhere
    assert_eq!(app.state.price_repo.count().unwrap(), 0);
    assert!(app.market_service.current_prices().unwrap().is_empty());
    assert!(app.market_service.history(30).unwrap().is_empty());
}

#[test]
fn test_three_varieties_one_observation_each() {
    let app = TestApp::new();
    let now = Utc::now().naive_utc();

    for variety in ["A", "B", "C"] {
        app.state
            .price_repo
            .record(price_at(variety, 100, now))
            .unwrap();
    }

    let prices = app.market_service.current_prices().unwrap();
    assert_eq!(prices.len(), 3);
    for view in &prices {
        assert_eq!(view.day_change, 0.0);
        assert_eq!(view.week_change, 0.0);
    }
}

#[test]
fn test_current_prices_preserve_first_seen_order() {
    let app = TestApp::new();
    let now = Utc::now().naive_utc();

    app.state
        .price_repo
        .record(price_at("Sergegna (Red)", 5300, now))
        .unwrap();
    app.state
        .price_repo
        .record(price_at("Magna (White)", 6800, now))
        .unwrap();
    app.state
        .price_repo
        .record(price_at("Sergegna (Red)", 5350, now))
        .unwrap();

    let prices = app.market_service.current_prices().unwrap();
    let varieties: Vec<&str> = prices
        .iter()
        .map(|v| v.observation.variety.as_str())
        .collect();
    assert_eq!(varieties, vec!["Sergegna (Red)", "Magna (White)"]);
}

#[test]
fn test_reads_are_idempotent() {
    let app = TestApp::new();
    seed_market_data(&app.state.price_repo);

    let first = serde_json::to_value(app.market_service.current_prices().unwrap()).unwrap();
    let second = serde_json::to_value(app.market_service.current_prices().unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_last_updated_is_most_recent_across_varieties() {
    let app = TestApp::new();
    let now = Utc::now().naive_utc();

    app.state
        .price_repo
        .record(price_at("Magna (White)", 6800, now - Duration::days(2)))
        .unwrap();
    app.state
        .price_repo
        .record(price_at("Mixed", 5950, now))
        .unwrap();

    assert_eq!(app.market_service.last_updated().unwrap(), Some(now));
}

#[test]
fn test_last_updated_empty_store() {
    let app = TestApp::new();
    assert_eq!(app.market_service.last_updated().unwrap(), None);
}

/// Unit tests for the history query

#[test]
fn test_history_is_a_genuine_query() {
    let app = TestApp::new();
    let now = Utc::now().naive_utc();

    app.state
        .price_repo
        .record(price_at("Magna (White)", 6700, now - Duration::days(1)))
        .unwrap();
    app.state
        .price_repo
        .record(price_at("Magna (White)", 6800, now))
        .unwrap();

    let rows = app.market_service.history(30).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, (now - Duration::days(1)).date());
    assert_eq!(rows[0].prices["Magna (White)"], 6700);
    assert_eq!(rows[1].date, now.date());
    assert_eq!(rows[1].prices["Magna (White)"], 6800);
}

#[test]
fn test_history_keeps_last_price_per_day() {
    let app = TestApp::new();
    let now = Utc::now().naive_utc();

    app.state
        .price_repo
        .record(price_at("Mixed", 5900, now - Duration::hours(3)))
        .unwrap();
    app.state
        .price_repo
        .record(price_at("Mixed", 5950, now))
        .unwrap();

    let rows = app.market_service.history(7).unwrap();
    // Both observations may share a calendar day; the later one wins
    let row = rows.last().unwrap();
    assert_eq!(row.prices["Mixed"], 5950);
}

#[test]
fn test_history_window_excludes_old_observations() {
    let app = TestApp::new();
    let now = Utc::now().naive_utc();

    app.state
        .price_repo
        .record(price_at("Mixed", 5000, now - Duration::days(40)))
        .unwrap();
    app.state
        .price_repo
        .record(price_at("Mixed", 5950, now))
        .unwrap();

    let rows = app.market_service.history(30).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].prices["Mixed"], 5950);
}

/// Unit tests for derived insights

#[test]
fn test_insights_flag_falling_prices() {
    let app = TestApp::new();
    let now = Utc::now().naive_utc();

    // Down 10% over the week
    app.state
        .price_repo
        .record(price_at("Magna (White)", 1000, now - Duration::days(7)))
        .unwrap();
    app.state
        .price_repo
        .record(price_at("Magna (White)", 900, now))
        .unwrap();

    let insights = app.market_service.insights().unwrap();
    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0].kind, "success");
    assert!(insights[0].description.contains("Magna (White)"));
    assert!(insights[0].description.contains("10.0"));
}

#[test]
fn test_insights_flag_rising_prices() {
    let app = TestApp::new();
    let now = Utc::now().naive_utc();

    // Up 20% over the week
    app.state
        .price_repo
        .record(price_at("Mixed", 1000, now - Duration::days(7)))
        .unwrap();
    app.state
        .price_repo
        .record(price_at("Mixed", 1200, now))
        .unwrap();

    let insights = app.market_service.insights().unwrap();
    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0].kind, "warning");
}

#[test]
fn test_insights_stable_market_fallback() {
    let app = TestApp::new();
    let now = Utc::now().naive_utc();

    app.state
        .price_repo
        .record(price_at("Mixed", 1000, now))
        .unwrap();

    let insights = app.market_service.insights().unwrap();
    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0].kind, "info");
}

#[test]
fn test_insights_empty_store_yields_none() {
    let app = TestApp::new();
    assert!(app.market_service.insights().unwrap().is_empty());
}

/// Unit tests for models

#[test]
fn test_user_type_conversion() {
    assert_eq!(UserType::Farmer.as_str(), "farmer");
    assert_eq!(UserType::Buyer.as_str(), "buyer");
    assert_eq!(UserType::from_str("BUYER").unwrap(), UserType::Buyer);
    assert!(UserType::from_str("trader").is_err());
}

#[test]
fn test_alert_frequency_conversion() {
    assert_eq!(AlertFrequency::Daily.as_str(), "daily");
    assert_eq!(AlertFrequency::Weekly.as_str(), "weekly");
    assert_eq!(AlertFrequency::Daily.interval_hours(), 24);
    assert_eq!(AlertFrequency::Weekly.interval_hours(), 168);
    assert!(AlertFrequency::from_str("hourly").is_err());
}

#[test]
fn test_unit_defaults_to_quintal() {
    let app = TestApp::new();
    let now = Utc::now().naive_utc();

    let price = app
        .state
        .price_repo
        .record(price_at("Mixed", 5950, now))
        .unwrap();
    assert_eq!(price.unit, DEFAULT_UNIT);
}
