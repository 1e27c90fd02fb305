//! SMS gateway client backed by the Twilio Messages API.
//!
//! This module provides the interface between the backend and the SMS
//! transport. When Twilio credentials are not configured the client runs
//! in mock mode: sends are logged and acknowledged with a synthetic
//! message id, which keeps development and tests free of network calls.

use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Error types for SMS delivery
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// Recipient is not a plausible E.164 number
    #[error("Invalid recipient '{0}': must include a country code (e.g. +251...)")]
    InvalidRecipient(String),

    /// Message body is empty
    #[error("Message cannot be empty")]
    EmptyMessage,

    /// Transport-level failure reaching the gateway
    #[error("SMS transport error: {0}")]
    Transport(String),

    /// The gateway rejected the request
    #[error("SMS gateway error ({status}): {message}")]
    Gateway { status: u16, message: String },
}

/// Result type for SMS operations
pub type SmsResult<T> = Result<T, DeliveryError>;

/// Configuration for the Twilio client
#[derive(Clone, Debug)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

impl TwilioConfig {
    /// Load Twilio credentials from environment variables
    ///
    /// Returns `None` when any of them is missing, which switches the
    /// client to mock mode.
    pub fn from_env() -> Option<Self> {
        let account_sid = std::env::var("TWILIO_ACCOUNT_SID").ok()?;
        let auth_token = std::env::var("TWILIO_AUTH_TOKEN").ok()?;
        let from_number = std::env::var("TWILIO_PHONE_NUMBER").ok()?;

        if account_sid.is_empty() || auth_token.is_empty() || from_number.is_empty() {
            return None;
        }

        Some(Self {
            account_sid,
            auth_token,
            from_number,
        })
    }
}

/// Outcome of a bulk send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkSendOutcome {
    pub sent: usize,
    pub failed: usize,
}

/// SMS client for price alerts and subscription confirmations
pub struct TwilioClient {
    config: Option<TwilioConfig>,
    http: reqwest::Client,
}

impl TwilioClient {
    /// Create a client from environment credentials
    pub fn from_env() -> Self {
        let config = TwilioConfig::from_env();
        match &config {
            Some(_) => info!("Twilio client initialized"),
            None => warn!("Twilio credentials not provided, SMS sends will be mocked"),
        }
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Create a client that never touches the network
    pub fn mock() -> Self {
        Self {
            config: None,
            http: reqwest::Client::new(),
        }
    }

    /// Whether this client is running in mock mode
    pub fn is_mock(&self) -> bool {
        self.config.is_none()
    }

    /// Send a single SMS; returns the gateway message id
    pub async fn send_sms(&self, to: &str, message: &str) -> SmsResult<String> {
        let recipient = normalize_recipient(to)?;

        if message.is_empty() {
            return Err(DeliveryError::EmptyMessage);
        }

        let Some(config) = &self.config else {
            info!("[mock] SMS to {}: {}", recipient, message);
            return Ok(format!("mock-{}", Uuid::new_v4()));
        };

        let url = format!(
            "{}/Accounts/{}/Messages.json",
            TWILIO_API_BASE, config.account_sid
        );

        let response = self
            .http
            .post(&url)
            .basic_auth(&config.account_sid, Some(&config.auth_token))
            .form(&[
                ("To", recipient.as_str()),
                ("From", config.from_number.as_str()),
                ("Body", message),
            ])
            .timeout(SEND_TIMEOUT)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Gateway {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let sid = body["sid"]
            .as_str()
            .ok_or_else(|| DeliveryError::Transport("response missing message sid".to_string()))?;

        info!("SMS sent to {}, sid: {}", recipient, sid);
        Ok(sid.to_string())
    }

    /// Send the same message to many recipients
    ///
    /// Individual failures are logged and counted; the batch never aborts.
    pub async fn send_bulk(&self, recipients: &[String], message: &str) -> BulkSendOutcome {
        let mut outcome = BulkSendOutcome { sent: 0, failed: 0 };

        for recipient in recipients {
            match self.send_sms(recipient, message).await {
                Ok(_) => outcome.sent += 1,
                Err(e) => {
                    warn!("Failed to send SMS to {}: {}", recipient, e);
                    outcome.failed += 1;
                }
            }
        }

        outcome
    }
}

/// Strip whitespace and validate the recipient as `+` followed by
/// 8-15 digits
fn normalize_recipient(to: &str) -> SmsResult<String> {
    let cleaned: String = to.chars().filter(|c| !c.is_whitespace()).collect();

    match cleaned.strip_prefix('+') {
        Some(digits)
            if (8..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()) =>
        {
            Ok(cleaned)
        }
        _ => Err(DeliveryError::InvalidRecipient(to.to_string())),
    }
}
