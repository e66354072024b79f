mod cache;
mod fetcher;
pub mod models;
mod normalize;
pub mod time;

pub use cache::CachedFeed;
pub use fetcher::{parse_feed, FeedSource, HttpFeedFetcher};
pub use models::{CacheEntry, Event, EventGroup, RawFeed};
pub use normalize::{clean_text, normalize_and_group};
