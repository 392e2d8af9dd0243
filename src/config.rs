use anyhow::{Result, anyhow};
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8001";
pub const DEFAULT_HEALTH_INTERVAL: Duration = Duration::from_secs(30);

/// Client configuration. The backend address is fixed at startup; there is no
/// runtime discovery.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Base URL all endpoints are relative to.
    pub api_url: String,
    /// Period of the background health poll.
    pub health_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            health_interval: DEFAULT_HEALTH_INTERVAL,
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment, reading a `.env` file first
    /// when one exists. Unset variables fall back to defaults.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let api_url = env::var("RAGCHAT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let health_interval = match env::var("RAGCHAT_HEALTH_INTERVAL_SECS") {
            Ok(raw) => {
                let secs: u64 = raw
                    .parse()
                    .map_err(|_| anyhow!("invalid RAGCHAT_HEALTH_INTERVAL_SECS: {raw}"))?;
                Duration::from_secs(secs)
            }
            Err(_) => DEFAULT_HEALTH_INTERVAL,
        };

        Ok(Self {
            api_url,
            health_interval,
        })
    }
}
