use crate::error::{env_error, AppResult, Error};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;

/// Default community calendar feed
pub const DEFAULT_FEED_URL: &str =
    "https://www.grinnellchamber.org/en/events/community_calendar/";

/// Default timezone for calendar-day grouping (the feed source's local zone)
pub const DEFAULT_TIMEZONE: &str = "America/Chicago";

/// Default completion model
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default completion API base URL
pub const DEFAULT_COMPLETION_BASE_URL: &str = "https://api.openai.com/v1";

/// Overrides that can be supplied via config/feed.toml
#[derive(Debug, Default, Deserialize)]
struct FeedFileConfig {
    feed_url: Option<String>,
    timezone: Option<String>,
}

/// Main configuration structure for the application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// OpenAI-compatible API key for the completion endpoint
    pub openai_api_key: String,
    /// RSS feed URL to fetch community events from
    pub feed_url: String,
    /// Timezone used when grouping events by calendar day
    pub timezone: String,
    /// Redis connection URL for the event cache
    pub redis_url: String,
    /// Model name sent to the completion endpoint
    pub completion_model: String,
    /// Base URL of the completion endpoint
    pub completion_base_url: String,
    /// Timeout applied to every outbound HTTP request, in seconds
    pub http_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // The API key is required; its absence must surface before any
        // network call is attempted
        let openai_api_key =
            env::var("OPENAI_API_KEY").map_err(|_| env_error("OPENAI_API_KEY"))?;

        let mut feed_url =
            env::var("FEED_URL").unwrap_or_else(|_| String::from(DEFAULT_FEED_URL));
        let mut timezone =
            env::var("TIMEZONE").unwrap_or_else(|_| String::from(DEFAULT_TIMEZONE));

        let redis_url = env::var("REDIS_URL")
            .unwrap_or_else(|_| String::from("redis://127.0.0.1:6379"));

        let completion_model =
            env::var("COMPLETION_MODEL").unwrap_or_else(|_| String::from(DEFAULT_MODEL));
        let completion_base_url = env::var("COMPLETION_BASE_URL")
            .unwrap_or_else(|_| String::from(DEFAULT_COMPLETION_BASE_URL));

        let http_timeout_secs = match env::var("HTTP_TIMEOUT_SECS") {
            Ok(value) => value
                .parse::<u64>()
                .map_err(|_| env_error("Invalid HTTP_TIMEOUT_SECS format"))?,
            Err(_) => 30,
        };

        // Load feed configuration from file if it exists
        if let Ok(content) = fs::read_to_string("config/feed.toml") {
            if let Ok(file_config) = toml::from_str::<FeedFileConfig>(&content) {
                if let Some(url) = file_config.feed_url {
                    feed_url = url;
                }
                if let Some(tz) = file_config.timezone {
                    timezone = tz;
                }
            }
        }

        let config = Config {
            openai_api_key,
            feed_url,
            timezone,
            redis_url,
            completion_model,
            completion_base_url,
            http_timeout_secs,
        };

        // Reject an unknown timezone name up front
        config.tz()?;

        Ok(config)
    }

    /// Parse the configured timezone name
    pub fn tz(&self) -> AppResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| Error::Config(format!("Unknown timezone: {}", self.timezone)))
    }
}
