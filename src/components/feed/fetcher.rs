use super::models::RawFeed;
use crate::config::Config;
use crate::error::{fetch_error, AppResult, Error};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

/// Source of raw feed documents, implemented over HTTP in production and
/// stubbed out in tests
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> AppResult<RawFeed>;
}

/// Fetches and parses the community calendar RSS feed
pub struct HttpFeedFetcher {
    client: Client,
    url: Url,
}

impl HttpFeedFetcher {
    /// Build a fetcher for the configured feed endpoint. The endpoint selects
    /// RSS output via an `action=rss` query parameter.
    pub fn new(config: &Config, client: Client) -> AppResult<Self> {
        let mut url = Url::parse(&config.feed_url)
            .map_err(|e| Error::Config(format!("Invalid feed URL: {}", e)))?;

        if !url.query_pairs().any(|(key, _)| key == "action") {
            url.query_pairs_mut().append_pair("action", "rss");
        }

        Ok(Self { client, url })
    }
}

#[async_trait]
impl FeedSource for HttpFeedFetcher {
    async fn fetch(&self) -> AppResult<RawFeed> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| fetch_error(&format!("Failed to fetch feed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(fetch_error(&format!(
                "Failed to fetch feed: HTTP {} - {}",
                status, error_body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| fetch_error(&format!("Failed to read feed body: {}", e)))?;

        parse_feed(&body)
    }
}

/// Parse a raw XML document into the feed structure
pub fn parse_feed(xml: &str) -> AppResult<RawFeed> {
    quick_xml::de::from_str::<RawFeed>(xml)
        .map_err(|e| Error::FeedParse(format!("Malformed feed XML: {}", e)))
}
