use super::fetcher::FeedSource;
use super::models::{CacheEntry, EventGroup};
use super::normalize::normalize_and_group;
use crate::components::storage::{keys, StorageActorHandle};
use crate::error::AppResult;
use chrono::Utc;
use chrono_tz::Tz;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Stale-while-revalidate coordinator over the single event cache slot.
///
/// A warm cache hit is returned immediately while a detached refresh runs for
/// the benefit of the next caller; a cold start blocks on the fetch.
#[derive(Clone)]
pub struct CachedFeed {
    source: Arc<dyn FeedSource>,
    storage: StorageActorHandle,
    tz: Tz,
    refresh_in_flight: Arc<AtomicBool>,
}

impl CachedFeed {
    pub fn new(source: Arc<dyn FeedSource>, storage: StorageActorHandle, tz: Tz) -> Self {
        Self {
            source,
            storage,
            tz,
            refresh_in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get the grouped events, serving cached data when available.
    ///
    /// Storage read failures count as a cache miss. On a warm hit the
    /// background refresh's outcome is never awaited and its errors are only
    /// logged, so a transient network failure never degrades a hit. On a cold
    /// start the fetch error surfaces, and nothing is written.
    pub async fn get_events(&self) -> AppResult<Vec<EventGroup>> {
        let cached = match self.storage.get_entry(keys::CHAMBER_EVENTS).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cache read failed, treating as miss: {}", e);
                None
            }
        };

        match cached {
            Some(entry) => {
                self.spawn_refresh();
                Ok(entry.groups)
            }
            None => self.refresh_now().await,
        }
    }

    /// Fetch, normalize and store a fresh snapshot, returning the new groups.
    /// Persistence is best-effort; a write failure is logged and ignored.
    pub async fn refresh_now(&self) -> AppResult<Vec<EventGroup>> {
        let raw = self.source.fetch().await?;
        let groups = normalize_and_group(raw, self.tz)?;

        let entry = CacheEntry {
            fetched_at: Utc::now(),
            groups: groups.clone(),
        };
        if let Err(e) = self.storage.save_entry(keys::CHAMBER_EVENTS, entry).await {
            warn!("Cache write failed: {}", e);
        }

        Ok(groups)
    }

    /// Kick off a detached refresh. At most one spawned refresh runs at a
    /// time; an overlapping trigger is dropped. The task is never joined and
    /// is abandoned mid-flight if the process exits first.
    fn spawn_refresh(&self) {
        if self
            .refresh_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let this = self.clone();
        tokio::spawn(async move {
            match this.refresh_now().await {
                Ok(groups) => info!("Background feed refresh stored {} groups", groups.len()),
                Err(e) => warn!("Background feed refresh failed: {}", e),
            }
            this.refresh_in_flight.store(false, Ordering::Release);
        });
    }
}
