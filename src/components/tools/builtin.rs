use super::registry::{Tool, ToolHandler, ToolRegistry};
use crate::components::feed::time::{group_date, parse_range_bound};
use crate::components::feed::CachedFeed;
use crate::error::{AppResult, Error};
use chrono_tz::Tz;
use futures::FutureExt;
use schemars::{schema_for, JsonSchema};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Arguments for the date-range event tools
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DateRangeArgs {
    /// Inclusive start of the range, as an ISO-8601 date or datetime
    pub start_date: String,
    /// Inclusive end of the range, as an ISO-8601 date or datetime
    pub end_date: String,
}

/// Register the event lookup tools against a cached feed
pub fn register_event_tools(
    registry: &mut ToolRegistry,
    feed: CachedFeed,
    tz: Tz,
) -> AppResult<()> {
    let range_schema = serde_json::to_value(schema_for!(DateRangeArgs))?;

    let range_feed = feed.clone();
    let range_handler: ToolHandler = Arc::new(move |args: Value| {
        let feed = range_feed.clone();
        async move {
            let range: DateRangeArgs = serde_json::from_value(args)
                .map_err(|e| Error::ToolExecution(format!("invalid arguments: {}", e)))?;

            let start = parse_range_bound(&range.start_date, tz).ok_or_else(|| {
                Error::ToolExecution(format!("unparseable startDate: {}", range.start_date))
            })?;
            let end = parse_range_bound(&range.end_date, tz).ok_or_else(|| {
                Error::ToolExecution(format!("unparseable endDate: {}", range.end_date))
            })?;

            let groups = feed.get_events().await?;
            let selected: Vec<_> = groups
                .into_iter()
                .filter(|group| {
                    group_date(&group.title)
                        .map(|date| date >= start && date <= end)
                        .unwrap_or(false)
                })
                .collect();

            Ok(serde_json::to_value(selected)?)
        }
        .boxed()
    });

    registry.register(Tool::new(
        "get_events_from_date_cached",
        "Get community events happening in Grinnell between two dates (inclusive)",
        range_schema,
        range_handler,
    ))?;

    let all_handler: ToolHandler = Arc::new(move |_args: Value| {
        let feed = feed.clone();
        async move {
            let groups = feed.get_events().await?;
            Ok(serde_json::to_value(groups)?)
        }
        .boxed()
    });

    registry.register(Tool::new(
        "get_all_events",
        "Get all upcoming community events in Grinnell, grouped by day",
        json!({
            "type": "object",
            "properties": {},
            "required": [],
            "additionalProperties": false
        }),
        all_handler,
    ))?;

    Ok(())
}
