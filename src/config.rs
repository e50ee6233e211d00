use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "gaboma-geo")]
#[command(about = "Proximity ranking and rate limiting for the Gaboma business directory")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // JSON file with an array of business rows, loaded at startup
    #[arg(long)]
    pub catalog_path: Option<PathBuf>,

    // REST endpoint returning business rows (e.g. the businesses table)
    #[arg(long)]
    pub catalog_url: Option<String>,

    // Catalog refresh interval in seconds
    #[arg(long, default_value_t = 300)]
    pub catalog_refresh: u64,

    // General API calls: max requests per window
    #[arg(long, default_value_t = 100)]
    pub api_rate_limit: u32,

    // General API window in seconds
    #[arg(long, default_value_t = 60)]
    pub api_rate_window: u64,

    // Messages: max sends per window
    #[arg(long, default_value_t = 30)]
    pub message_rate_limit: u32,

    #[arg(long, default_value_t = 60)]
    pub message_rate_window: u64,

    // Business creation: max creations per window
    #[arg(long, default_value_t = 5)]
    pub business_rate_limit: u32,

    #[arg(long, default_value_t = 3600)]
    pub business_rate_window: u64,

    // Expired rate limit entries are swept this often (seconds)
    #[arg(long, default_value_t = 300)]
    pub sweep_interval: u64,
}

// Longest accepted rate limit window, 30 days
pub const MAX_RATE_WINDOW_SECS: u64 = 30 * 24 * 3600;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),

    #[error("{0} must be at most {max} seconds", max = MAX_RATE_WINDOW_SECS)]
    WindowTooLong(&'static str),
}

impl Args {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("api-rate-limit", u64::from(self.api_rate_limit)),
            ("api-rate-window", self.api_rate_window),
            ("message-rate-limit", u64::from(self.message_rate_limit)),
            ("message-rate-window", self.message_rate_window),
            ("business-rate-limit", u64::from(self.business_rate_limit)),
            ("business-rate-window", self.business_rate_window),
            ("sweep-interval", self.sweep_interval),
            ("catalog-refresh", self.catalog_refresh),
        ];
        if let Some((name, _)) = checks.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::NotPositive(*name));
        }

        let windows = [
            ("api-rate-window", self.api_rate_window),
            ("message-rate-window", self.message_rate_window),
            ("business-rate-window", self.business_rate_window),
        ];
        match windows.iter().find(|(_, secs)| *secs > MAX_RATE_WINDOW_SECS) {
            Some((name, _)) => Err(ConfigError::WindowTooLong(*name)),
            None => Ok(()),
        }
    }

    pub fn sweep_every(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }

    pub fn catalog_refresh_every(&self) -> Duration {
        Duration::from_secs(self.catalog_refresh)
    }
}
