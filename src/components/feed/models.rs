use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parsed RSS document, events live at `rss > channel > item`
#[derive(Debug, Clone, Deserialize)]
pub struct RawFeed {
    pub channel: Channel,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    #[serde(rename = "item", default)]
    pub items: Vec<RssItem>,
}

/// One raw feed item, text fields still carry HTML entities and stray whitespace
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RssItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "pubDate", default)]
    pub pub_date: String,
    #[serde(default)]
    pub guid: Guid,
    pub link: Option<String>,
}

/// The guid element may carry an isPermaLink attribute, so it needs its own type
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Guid {
    #[serde(rename = "$text", default)]
    pub value: String,
}

/// Normalized calendar event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub description: String,
    /// Canonical RFC3339 UTC timestamp
    #[serde(rename = "pubDate")]
    pub pub_date: String,
    pub guid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Events sharing one calendar day, in feed order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventGroup {
    /// Display date of the group, e.g. "Wed Jun 12 2024"
    pub title: String,
    pub items: Vec<Event>,
}

/// The persisted cache snapshot, always replaced wholesale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// When the snapshot was fetched; kept for future TTL policies
    pub fetched_at: DateTime<Utc>,
    pub groups: Vec<EventGroup>,
}
