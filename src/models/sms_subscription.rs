use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// How often a subscriber receives price alert digests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertFrequency {
    Daily,
    Weekly,
}

impl AlertFrequency {
    /// Convert from stored string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(AlertFrequency::Daily),
            "weekly" => Ok(AlertFrequency::Weekly),
            _ => Err(format!("Invalid alert frequency: {}", s)),
        }
    }

    /// Convert to stored string
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertFrequency::Daily => "daily",
            AlertFrequency::Weekly => "weekly",
        }
    }

    /// Minimum number of hours between two digests at this frequency
    pub fn interval_hours(&self) -> i64 {
        match self {
            AlertFrequency::Daily => 24,
            AlertFrequency::Weekly => 24 * 7,
        }
    }
}

impl From<String> for AlertFrequency {
    fn from(s: String) -> Self {
        Self::from_str(&s).unwrap_or(AlertFrequency::Daily)
    }
}

impl From<AlertFrequency> for String {
    fn from(frequency: AlertFrequency) -> Self {
        frequency.as_str().to_string()
    }
}

/// SMS subscription model for price alerts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsSubscription {
    pub id: i64,
    pub user_id: Option<i64>,
    pub phone_number: String,
    pub market_id: String,
    pub product_id: String,
    pub frequency: String, // Stored as text, use AlertFrequency enum for type safety
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insert payload for a new SMS subscription
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSmsSubscription {
    pub user_id: Option<i64>,
    pub phone_number: String,
    pub market_id: String,
    pub product_id: String,
    #[serde(default)]
    pub frequency: Option<AlertFrequency>,
}

impl SmsSubscription {
    /// Get frequency as an enum
    pub fn frequency_enum(&self) -> AlertFrequency {
        AlertFrequency::from_str(&self.frequency).unwrap_or(AlertFrequency::Daily)
    }
}
