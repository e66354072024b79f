use async_trait::async_trait;
use chrono::Utc;
use chrono_tz::Tz;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use townkrier::components::feed::models::{Channel, Guid, RawFeed, RssItem};
use townkrier::components::feed::{CacheEntry, CachedFeed, EventGroup, FeedSource};
use townkrier::components::storage::{keys, StorageActor, StorageActorHandle};
use townkrier::error::{fetch_error, AppResult, Error};

fn central() -> Tz {
    "America/Chicago".parse().unwrap()
}

fn raw_feed(items: &[(&str, &str, &str)]) -> RawFeed {
    RawFeed {
        channel: Channel {
            items: items
                .iter()
                .map(|(title, pub_date, guid)| RssItem {
                    title: title.to_string(),
                    description: String::from("d"),
                    pub_date: pub_date.to_string(),
                    guid: Guid {
                        value: guid.to_string(),
                    },
                    link: None,
                })
                .collect(),
        },
    }
}

fn spawn_memory_storage() -> StorageActorHandle {
    let (mut actor, handle) = StorageActor::memory();
    tokio::spawn(async move {
        actor.run().await;
    });
    handle
}

/// Feed source that serves a fixed sequence of documents
struct SequenceFeed {
    feeds: Mutex<VecDeque<RawFeed>>,
}

impl SequenceFeed {
    fn new(feeds: Vec<RawFeed>) -> Self {
        Self {
            feeds: Mutex::new(feeds.into()),
        }
    }
}

#[async_trait]
impl FeedSource for SequenceFeed {
    async fn fetch(&self) -> AppResult<RawFeed> {
        self.feeds
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| fetch_error("feed exhausted"))
    }
}

/// Feed source that always fails
struct FailingFeed;

#[async_trait]
impl FeedSource for FailingFeed {
    async fn fetch(&self) -> AppResult<RawFeed> {
        Err(fetch_error("connection refused"))
    }
}

/// Feed source that takes far longer than any acceptable cache-hit latency
struct SlowFeed;

#[async_trait]
impl FeedSource for SlowFeed {
    async fn fetch(&self) -> AppResult<RawFeed> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(raw_feed(&[("Slow", "Wed, 12 Jun 2024 18:00:00 +0000", "slow-1")]))
    }
}

fn seeded_entry(title: &str) -> CacheEntry {
    CacheEntry {
        fetched_at: Utc::now(),
        groups: vec![EventGroup {
            title: title.to_string(),
            items: Vec::new(),
        }],
    }
}

#[tokio::test]
async fn test_cold_start_fetches_and_stores() {
    let storage = spawn_memory_storage();
    let feed = CachedFeed::new(
        Arc::new(SequenceFeed::new(vec![raw_feed(&[(
            "Market",
            "Wed, 12 Jun 2024 18:00:00 +0000",
            "e1",
        )])])),
        storage.clone(),
        central(),
    );

    let groups = feed.get_events().await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].items[0].title, "Market");

    // The snapshot was persisted
    let entry = storage.get_entry(keys::CHAMBER_EVENTS).await.unwrap();
    assert_eq!(entry.unwrap().groups[0].title, "Wed Jun 12 2024");
}

#[tokio::test]
async fn test_cold_start_failure_surfaces_and_writes_nothing() {
    let storage = spawn_memory_storage();
    let feed = CachedFeed::new(Arc::new(FailingFeed), storage.clone(), central());

    let result = feed.get_events().await;
    assert!(matches!(result, Err(Error::Fetch(_))));

    // No cache entry left behind
    let entry = storage.get_entry(keys::CHAMBER_EVENTS).await.unwrap();
    assert!(entry.is_none());
}

#[tokio::test]
async fn test_warm_hit_does_not_wait_on_the_network() {
    let storage = spawn_memory_storage();
    storage
        .save_entry(keys::CHAMBER_EVENTS, seeded_entry("Tue Jun 11 2024"))
        .await
        .unwrap();

    let feed = CachedFeed::new(Arc::new(SlowFeed), storage, central());

    // Must return from the cache well before the 5s feed fetch completes
    let groups = tokio::time::timeout(Duration::from_millis(500), feed.get_events())
        .await
        .expect("warm cache hit waited on the network")
        .unwrap();
    assert_eq!(groups[0].title, "Tue Jun 11 2024");
}

#[tokio::test]
async fn test_warm_hit_refreshes_in_background() {
    let storage = spawn_memory_storage();
    storage
        .save_entry(keys::CHAMBER_EVENTS, seeded_entry("Tue Jun 11 2024"))
        .await
        .unwrap();

    let feed = CachedFeed::new(
        Arc::new(SequenceFeed::new(vec![raw_feed(&[(
            "Fresh",
            "Fri, 14 Jun 2024 17:00:00 +0000",
            "f1",
        )])])),
        storage.clone(),
        central(),
    );

    // Warm call serves the stale snapshot
    let stale = feed.get_events().await.unwrap();
    assert_eq!(stale[0].title, "Tue Jun 11 2024");

    // The detached refresh eventually overwrites the slot
    let mut refreshed = None;
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(20)).await;
        if let Some(entry) = storage.get_entry(keys::CHAMBER_EVENTS).await.unwrap() {
            if entry.groups[0].title == "Fri Jun 14 2024" {
                refreshed = Some(entry);
                break;
            }
        }
    }
    let entry = refreshed.expect("background refresh never landed");
    assert_eq!(entry.groups[0].items[0].title, "Fresh");

    // The next call sees the refreshed data
    let fresh = feed.get_events().await.unwrap();
    assert_eq!(fresh[0].title, "Fri Jun 14 2024");
}

#[tokio::test]
async fn test_warm_refresh_failure_is_swallowed() {
    let storage = spawn_memory_storage();
    storage
        .save_entry(keys::CHAMBER_EVENTS, seeded_entry("Tue Jun 11 2024"))
        .await
        .unwrap();

    let feed = CachedFeed::new(Arc::new(FailingFeed), storage.clone(), central());

    // The failing background refresh never degrades the hit
    let groups = feed.get_events().await.unwrap();
    assert_eq!(groups[0].title, "Tue Jun 11 2024");

    tokio::time::sleep(Duration::from_millis(50)).await;

    // The stale entry is still intact
    let entry = storage.get_entry(keys::CHAMBER_EVENTS).await.unwrap();
    assert_eq!(entry.unwrap().groups[0].title, "Tue Jun 11 2024");
}

#[tokio::test]
async fn test_storage_failure_degrades_to_cold_fetch() {
    // An empty handle fails every read and write; reads count as a miss and
    // writes are best-effort, so the fetch result still comes back
    let feed = CachedFeed::new(
        Arc::new(SequenceFeed::new(vec![raw_feed(&[(
            "Market",
            "Wed, 12 Jun 2024 18:00:00 +0000",
            "e1",
        )])])),
        StorageActorHandle::empty(),
        central(),
    );

    let groups = feed.get_events().await.unwrap();
    assert_eq!(groups[0].items[0].title, "Market");
}
