//! HTTP service implementation for FarmLink
//!
//! This module maps the REST API onto the services layer using axum.
//! All routes live under `/api`; errors serialize as `{ "message": ... }`
//! with the status code taken from [`AppError::status_code`].

use crate::config::MarketConfig;
use crate::error::{option_to_result, AppError, AppResult};
use crate::models::{
    AlertFrequency, NewMarketPrice, NewProduct, NewSmsSubscription, NewUser, ProductUpdate,
};
use crate::repositories::{ProductRepository, UserRepository};
use crate::services::{MarketService, SubscriptionService};
use crate::sms_client::TwilioClient;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use chrono::SecondsFormat;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

/// Shared handler state
#[derive(Clone)]
pub struct ApiContext {
    pub market_service: Arc<MarketService>,
    pub subscription_service: Arc<SubscriptionService>,
    pub user_repo: Arc<UserRepository>,
    pub product_repo: Arc<ProductRepository>,
    pub sms_client: Arc<TwilioClient>,
    pub market_config: MarketConfig,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

/// Build the axum router for the REST API
pub fn router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/market/prices/current", get(current_prices))
        .route("/api/market/prices", post(record_price))
        .route("/api/market/prices/history", get(price_history))
        .route("/api/market/insights", get(market_insights))
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/:id",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .route("/api/users", post(create_user))
        .route("/api/users/:id", get(get_user))
        .route("/api/sms/send", post(send_sms))
        .route("/api/sms/subscribe", post(subscribe))
        .route("/api/sms/unsubscribe", post(unsubscribe))
        .route("/api/sms/status", get(subscription_status))
        .route("/api/sms/webhook", post(sms_webhook))
        .with_state(ctx)
}

// === Health ===

async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

// === Market price routes ===

async fn current_prices(State(ctx): State<ApiContext>) -> AppResult<Json<serde_json::Value>> {
    let prices = ctx.market_service.current_prices()?;

    let last_updated = ctx
        .market_service
        .last_updated()?
        .unwrap_or_else(|| chrono::Utc::now().naive_utc());

    let data: Vec<serde_json::Value> = prices
        .iter()
        .map(|view| {
            json!({
                "type": view.observation.variety,
                "price": view.observation.price,
                "dayChange": view.day_change,
                "weekChange": view.week_change,
            })
        })
        .collect();

    Ok(Json(json!({
        "data": data,
        "lastUpdated": last_updated
            .and_utc()
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        "source": ctx.market_config.price_source,
    })))
}

async fn record_price(
    State(ctx): State<ApiContext>,
    Json(input): Json<NewMarketPrice>,
) -> AppResult<impl IntoResponse> {
    let price = ctx.market_service.record_price(input)?;
    Ok((StatusCode::CREATED, Json(price)))
}

#[derive(Debug, Deserialize)]
struct HistoryParams {
    days: Option<i64>,
}

async fn price_history(
    State(ctx): State<ApiContext>,
    Query(params): Query<HistoryParams>,
) -> AppResult<impl IntoResponse> {
    let days = params
        .days
        .unwrap_or(ctx.market_config.history_window_days);
    if days <= 0 {
        return Err(AppError::Validation(format!(
            "days must be positive, got {}",
            days
        )));
    }

    let rows = ctx.market_service.history(days)?;
    Ok(Json(rows))
}

async fn market_insights(State(ctx): State<ApiContext>) -> AppResult<impl IntoResponse> {
    let insights = ctx.market_service.insights()?;
    Ok(Json(json!({ "data": insights })))
}

// === Product routes ===

async fn list_products(State(ctx): State<ApiContext>) -> AppResult<impl IntoResponse> {
    let products = ctx.product_repo.find_all()?;
    Ok(Json(products))
}

async fn get_product(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let product = option_to_result(ctx.product_repo.find_by_id(id)?, "Product not found")?;
    Ok(Json(product))
}

async fn create_product(
    State(ctx): State<ApiContext>,
    Json(input): Json<NewProduct>,
) -> AppResult<impl IntoResponse> {
    if let Some(seller_id) = input.seller_id {
        if ctx.user_repo.find_by_id(seller_id)?.is_none() {
            return Err(AppError::Validation(format!(
                "Unknown seller id: {}",
                seller_id
            )));
        }
    }

    let product = ctx.product_repo.create(input)?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update_product(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
    Json(updates): Json<ProductUpdate>,
) -> AppResult<impl IntoResponse> {
    let product = option_to_result(ctx.product_repo.update(id, updates)?, "Product not found")?;
    Ok(Json(product))
}

async fn delete_product(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    if !ctx.product_repo.delete(id)? {
        return Err(AppError::NotFound("Product not found".to_string()));
    }
    Ok(Json(json!({ "success": true })))
}

// === User routes ===

async fn create_user(
    State(ctx): State<ApiContext>,
    Json(input): Json<NewUser>,
) -> AppResult<impl IntoResponse> {
    let user = ctx.user_repo.create(input)?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let user = option_to_result(ctx.user_repo.find_by_id(id)?, "User not found")?;
    Ok(Json(user))
}

// === SMS routes ===

#[derive(Debug, Deserialize)]
struct SendSmsRequest {
    to: String,
    message: String,
}

async fn send_sms(
    State(ctx): State<ApiContext>,
    Json(request): Json<SendSmsRequest>,
) -> AppResult<impl IntoResponse> {
    let message_id = ctx.sms_client.send_sms(&request.to, &request.message).await?;
    Ok(Json(json!({ "success": true, "messageId": message_id })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscribeRequest {
    phone_number: String,
    #[serde(default)]
    preferences: SubscriptionPreferences,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SubscriptionPreferences {
    product: String,
    market: String,
    frequency: AlertFrequency,
}

impl Default for SubscriptionPreferences {
    fn default() -> Self {
        Self {
            product: "teff".to_string(),
            market: "addis_ababa".to_string(),
            frequency: AlertFrequency::Daily,
        }
    }
}

async fn subscribe(
    State(ctx): State<ApiContext>,
    Json(request): Json<SubscribeRequest>,
) -> AppResult<impl IntoResponse> {
    let subscription = ctx
        .subscription_service
        .subscribe(NewSmsSubscription {
            user_id: None, // Would be set from the authenticated user
            phone_number: request.phone_number,
            market_id: request.preferences.market,
            product_id: request.preferences.product,
            frequency: Some(request.preferences.frequency),
        })
        .await?;

    Ok(Json(json!({ "success": true, "subscription": subscription })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnsubscribeRequest {
    phone_number: String,
}

async fn unsubscribe(
    State(ctx): State<ApiContext>,
    Json(request): Json<UnsubscribeRequest>,
) -> AppResult<impl IntoResponse> {
    if request.phone_number.trim().is_empty() {
        return Err(AppError::Validation("Phone number is required".to_string()));
    }

    ctx.subscription_service
        .unsubscribe(&request.phone_number)
        .await?;

    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
struct StatusParams {
    phone: Option<String>,
}

async fn subscription_status(
    State(ctx): State<ApiContext>,
    Query(params): Query<StatusParams>,
) -> AppResult<impl IntoResponse> {
    let phone = params
        .phone
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Phone number is required".to_string()))?;

    let is_subscribed = ctx.subscription_service.is_subscribed(&phone)?;
    Ok(Json(json!({
        "phoneNumber": phone,
        "isSubscribed": is_subscribed,
    })))
}

#[derive(Debug, Deserialize)]
struct TwilioWebhook {
    #[serde(rename = "From")]
    from: String,
    #[serde(rename = "Body")]
    body: String,
}

async fn sms_webhook(
    State(ctx): State<ApiContext>,
    Form(payload): Form<TwilioWebhook>,
) -> AppResult<impl IntoResponse> {
    let reply = ctx
        .subscription_service
        .handle_inbound(&payload.from, &payload.body)
        .await?;

    // TwiML response
    let twiml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response><Message>{}</Message></Response>",
        reply
    );
    Ok(([(header::CONTENT_TYPE, "text/xml")], twiml))
}
