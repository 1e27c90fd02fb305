use std::env;
use std::time::Duration;

/// Market data configuration
#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Label reported as the origin of published prices
    pub price_source: String,
    /// Default history window in days when the caller does not pass one
    pub history_window_days: i64,
}

/// Price alert broadcaster configuration
#[derive(Debug, Clone)]
pub struct AlertConfig {
    pub enabled: bool,
    pub poll_interval_secs: u64,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub market: MarketConfig,
    pub alerts: AlertConfig,
    pub log_level: String,
    pub http_port: u16,
    pub environment: String,
}

impl MarketConfig {
    /// Create market config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let price_source = env::var("PRICE_SOURCE")
            .unwrap_or_else(|_| "Ethiopian Grain Trade Enterprise".to_string());

        let history_window_days = env::var("HISTORY_WINDOW_DAYS")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(180); // 6 months

        if history_window_days <= 0 {
            return Err("HISTORY_WINDOW_DAYS must be greater than 0".to_string());
        }

        Ok(Self {
            price_source,
            history_window_days,
        })
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            price_source: "Ethiopian Grain Trade Enterprise".to_string(),
            history_window_days: 180,
        }
    }
}

impl AlertConfig {
    /// Create alert config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let enabled = env::var("ALERTS_ENABLED")
            .ok()
            .and_then(|s| s.parse::<bool>().ok())
            .unwrap_or(true);

        let poll_interval_secs = env::var("ALERT_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(300); // 5 minutes

        if poll_interval_secs == 0 {
            return Err("ALERT_POLL_INTERVAL_SECS must be greater than 0".to_string());
        }

        Ok(Self {
            enabled,
            poll_interval_secs,
        })
    }

    /// Get poll interval as Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_secs: 300,
        }
    }
}

impl AppConfig {
    /// Create application config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let market = MarketConfig::from_env()?;
        let alerts = AlertConfig::from_env()?;

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let http_port = env::var("HTTP_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(5000);

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        // Validate log level
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid LOG_LEVEL: {}. Must be one of: {:?}",
                log_level, valid_log_levels
            ));
        }

        // Validate environment
        let valid_environments = ["development", "staging", "production"];
        if !valid_environments.contains(&environment.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid ENVIRONMENT: {}. Must be one of: {:?}",
                environment, valid_environments
            ));
        }

        Ok(Self {
            market,
            alerts,
            log_level: log_level.to_lowercase(),
            http_port,
            environment: environment.to_lowercase(),
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Check if running in development
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            market: MarketConfig::default(),
            alerts: AlertConfig::default(),
            log_level: "info".to_string(),
            http_port: 5000,
            environment: "development".to_string(),
        }
    }
}
