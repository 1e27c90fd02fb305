mod helpers;

use chrono::Utc;
use farmlink_backend::error::AppError;
use farmlink_backend::models::*;
use helpers::*;

/// Integration tests exercising the services layer end to end with a
/// mock SMS client

fn sample_subscription(phone: &str) -> NewSmsSubscription {
    NewSmsSubscription {
        user_id: None,
        phone_number: phone.to_string(),
        market_id: "addis_ababa".to_string(),
        product_id: "teff".to_string(),
        frequency: Some(AlertFrequency::Daily),
    }
}

#[tokio::test]
async fn test_subscribe_then_status_then_unsubscribe() {
    let app = TestApp::new();
    let phone = "+251911234567";

    assert!(!app.subscription_service.is_subscribed(phone).unwrap());

    let subscription = app
        .subscription_service
        .subscribe(sample_subscription(phone))
        .await
        .unwrap();
    assert!(subscription.is_active);
    assert_eq!(subscription.frequency, "daily");
    assert!(app.subscription_service.is_subscribed(phone).unwrap());

    let changed = app.subscription_service.unsubscribe(phone).await.unwrap();
    assert_eq!(changed, 1);
    assert!(!app.subscription_service.is_subscribed(phone).unwrap());
}

#[tokio::test]
async fn test_subscribe_requires_phone_number() {
    let app = TestApp::new();
    let result = app
        .subscription_service
        .subscribe(sample_subscription(""))
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_confirmation_to_invalid_recipient_fails_delivery() {
    let app = TestApp::new();
    let result = app
        .subscription_service
        .subscribe(sample_subscription("0911-no-country-code"))
        .await;
    assert!(matches!(result, Err(AppError::Sms(_))));
}

#[tokio::test]
async fn test_webhook_stop_and_start_update_subscriptions() {
    let app = TestApp::new();
    let phone = "+251911234567";

    app.subscription_service
        .subscribe(sample_subscription(phone))
        .await
        .unwrap();

    let reply = app
        .subscription_service
        .handle_inbound(phone, "STOP")
        .await
        .unwrap();
    assert!(reply.contains("unsubscribed"));
    assert!(!app.subscription_service.is_subscribed(phone).unwrap());

    let reply = app
        .subscription_service
        .handle_inbound(phone, "start")
        .await
        .unwrap();
    assert!(reply.contains("resubscribed"));
    assert!(app.subscription_service.is_subscribed(phone).unwrap());
}

#[tokio::test]
async fn test_webhook_price_command_uses_recorded_data() {
    let app = TestApp::new();
    seed_market_data(&app.state.price_repo);

    let reply = app
        .subscription_service
        .handle_inbound("+251911234567", "  Price ")
        .await
        .unwrap();

    assert!(reply.starts_with("Current teff prices in Addis Ababa:"));
    for variety in TEFF_VARIETIES {
        assert!(reply.contains(variety), "digest missing {}", variety);
    }
    assert!(reply.contains("ETB/quintal"));
}

#[tokio::test]
async fn test_webhook_price_command_with_empty_store() {
    let app = TestApp::new();
    let reply = app
        .subscription_service
        .handle_inbound("+251911234567", "PRICE")
        .await
        .unwrap();
    assert!(reply.contains("No prices have been recorded yet"));
}

#[tokio::test]
async fn test_webhook_help_and_unknown_commands() {
    let app = TestApp::new();

    let reply = app
        .subscription_service
        .handle_inbound("+251911234567", "HELP")
        .await
        .unwrap();
    assert!(reply.contains("PRICE"));
    assert!(reply.contains("STOP"));
    assert!(reply.contains("START"));

    let reply = app
        .subscription_service
        .handle_inbound("+251911234567", "bananas")
        .await
        .unwrap();
    assert!(reply.contains("Command not recognized"));
}

#[tokio::test]
async fn test_unsubscribe_covers_every_subscription_for_number() {
    let app = TestApp::new();
    let phone = "+251911234567";

    let mut weekly = sample_subscription(phone);
    weekly.frequency = Some(AlertFrequency::Weekly);

    app.subscription_service
        .subscribe(sample_subscription(phone))
        .await
        .unwrap();
    app.subscription_service.subscribe(weekly).await.unwrap();

    let changed = app.subscription_service.unsubscribe(phone).await.unwrap();
    assert_eq!(changed, 2);
    assert!(app
        .state
        .subscription_repo
        .find_active()
        .unwrap()
        .is_empty());
}

/// Product and user flows

#[test]
fn test_product_crud_flow() {
    let app = TestApp::new();

    let seller = app
        .state
        .user_repo
        .create(NewUser {
            username: "abebe".to_string(),
            display_name: Some("Abebe T.".to_string()),
            phone_number: Some("+251911234567".to_string()),
            user_type: Some(UserType::Farmer),
            location: Some("Addis Ababa".to_string()),
        })
        .unwrap();

    let product = app
        .state
        .product_repo
        .create(NewProduct {
            title: "White Teff (Magna)".to_string(),
            kind: "white".to_string(),
            quality: "Premium".to_string(),
            quantity: 3,
            price: 6800,
            location: "Addis Ababa, Kolfe".to_string(),
            description: Some("High-quality white teff from a verified seller.".to_string()),
            image: None,
            seller_id: Some(seller.id),
        })
        .unwrap();

    let updated = app
        .state
        .product_repo
        .update(
            product.id,
            ProductUpdate {
                price: Some(6900),
                quantity: Some(2),
                ..ProductUpdate::default()
            },
        )
        .unwrap()
        .expect("product should exist");
    assert_eq!(updated.price, 6900);
    assert_eq!(updated.quantity, 2);
    // Untouched fields are preserved
    assert_eq!(updated.title, "White Teff (Magna)");
    assert!(updated.updated_at >= product.updated_at);

    assert!(app.state.product_repo.delete(product.id).unwrap());
    assert!(app
        .state
        .product_repo
        .find_by_id(product.id)
        .unwrap()
        .is_none());
    assert!(!app.state.product_repo.delete(product.id).unwrap());
}

#[test]
fn test_product_update_rejects_non_positive_price() {
    let app = TestApp::new();

    let product = app
        .state
        .product_repo
        .create(NewProduct {
            title: "Mixed Teff".to_string(),
            kind: "mixed".to_string(),
            quality: "Standard".to_string(),
            quantity: 5,
            price: 5950,
            location: "Addis Ababa, Akaki".to_string(),
            description: None,
            image: None,
            seller_id: None,
        })
        .unwrap();

    let result = app.state.product_repo.update(
        product.id,
        ProductUpdate {
            price: Some(0),
            ..ProductUpdate::default()
        },
    );
    assert!(result.is_err());

    // The failed update must not partially apply
    let unchanged = app
        .state
        .product_repo
        .find_by_id(product.id)
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.price, 5950);
}

#[test]
fn test_duplicate_username_rejected() {
    let app = TestApp::new();

    let input = NewUser {
        username: "tigist".to_string(),
        display_name: None,
        phone_number: None,
        user_type: Some(UserType::Buyer),
        location: None,
    };

    app.state.user_repo.create(input.clone()).unwrap();
    assert!(app.state.user_repo.create(input).is_err());
}

#[test]
fn test_find_user_by_username() {
    let app = TestApp::new();

    app.state
        .user_repo
        .create(NewUser {
            username: "sara".to_string(),
            display_name: None,
            phone_number: None,
            user_type: None,
            location: None,
        })
        .unwrap();

    let found = app
        .state
        .user_repo
        .find_by_username("sara")
        .unwrap()
        .expect("user should exist");
    // user_type defaults to farmer
    assert_eq!(found.user_type_enum(), UserType::Farmer);
    assert!(app.state.user_repo.find_by_username("nobody").unwrap().is_none());
}

/// Record/read flow against the price store

#[test]
fn test_record_price_is_visible_in_all_read_paths() {
    let app = TestApp::new();
    let now = Utc::now().naive_utc();

    let recorded = app
        .market_service
        .record_price(price_at("Magna (White)", 6800, now))
        .unwrap();

    let prices = app.market_service.current_prices().unwrap();
    assert_eq!(prices.len(), 1);
    assert_eq!(prices[0].observation.id, recorded.id);

    let rows = app.market_service.history(7).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].prices["Magna (White)"], 6800);

    assert_eq!(app.market_service.last_updated().unwrap(), Some(now));
}
