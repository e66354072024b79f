use super::models::{Event, EventGroup, RawFeed};
use super::time::{day_title, parse_pub_date};
use crate::error::AppResult;
use chrono::{SecondsFormat, Utc};
use chrono_tz::Tz;
use std::collections::HashMap;

/// Clean a feed text field: replace non-breaking-space entities with plain
/// spaces, collapse whitespace runs and trim. Idempotent.
pub fn clean_text(input: &str) -> String {
    let replaced = input.replace("&nbsp;", " ").replace('\u{a0}', " ");
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize raw feed items and bucket them by calendar day in `tz`.
///
/// Groups are emitted in first-occurrence order as the feed is scanned, not
/// re-sorted chronologically; sorting is a presentation concern. A single
/// malformed pubDate fails the whole operation, naming the offending guid.
pub fn normalize_and_group(feed: RawFeed, tz: Tz) -> AppResult<Vec<EventGroup>> {
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Vec<Event>> = HashMap::new();

    for item in feed.channel.items {
        let parsed = parse_pub_date(&item.pub_date, &item.guid.value)?;
        let canonical = parsed.with_timezone(&Utc);
        let day = day_title(canonical, tz);

        let event = Event {
            title: clean_text(&item.title),
            description: clean_text(&item.description),
            pub_date: canonical.to_rfc3339_opts(SecondsFormat::Secs, true),
            guid: item.guid.value,
            link: item.link,
        };

        if !buckets.contains_key(&day) {
            order.push(day.clone());
        }
        buckets.entry(day).or_default().push(event);
    }

    Ok(order
        .into_iter()
        .map(|day| EventGroup {
            items: buckets.remove(&day).unwrap_or_default(),
            title: day,
        })
        .collect())
}
