use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // API configuration
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub log_level: String,

    // Display settings
    pub date_format: String,
    pub display_utc_offset_minutes: i32,
    pub mobile_breakpoint: u32,

    // Session (demo binary only; views receive an injected session)
    pub auth_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000/api".to_string(),
            request_timeout_secs: 30,
            log_level: "rainbow_blog_client=debug".to_string(),
            date_format: "%-m/%-d/%Y".to_string(),
            display_utc_offset_minutes: 0,
            mobile_breakpoint: 768,
            auth_token: None,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Config::default();

        let config = Config {
            api_url: env::var("API_URL").unwrap_or(defaults.api_url),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),

            date_format: env::var("DATE_FORMAT").unwrap_or(defaults.date_format),
            display_utc_offset_minutes: env::var("DISPLAY_UTC_OFFSET_MINUTES")
                .unwrap_or_else(|_| "0".to_string())
                .parse()?,
            mobile_breakpoint: env::var("MOBILE_BREAKPOINT")
                .unwrap_or_else(|_| "768".to_string())
                .parse()?,

            auth_token: env::var("AUTH_TOKEN").ok().filter(|t| !t.trim().is_empty()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        url::Url::parse(&self.api_url)
            .map_err(|e| anyhow::anyhow!("API_URL is not a valid URL: {}", e))?;

        // UTC 偏移必须在 ±24 小时之内
        if self.display_utc_offset_minutes.abs() >= 24 * 60 {
            anyhow::bail!(
                "DISPLAY_UTC_OFFSET_MINUTES out of range: {}",
                self.display_utc_offset_minutes
            );
        }

        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be greater than zero");
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
