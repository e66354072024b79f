use chrono_tz::Tz;
use townkrier::components::feed::{clean_text, normalize_and_group, parse_feed};
use townkrier::error::Error;

const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Community Calendar</title>
    <item>
      <title>  Farmers&amp;nbsp;Market </title>
      <description>Fresh   produce&amp;nbsp;and more.
      </description>
      <pubDate>Wed, 12 Jun 2024 18:00:00 +0000</pubDate>
      <guid isPermaLink="false">event-1</guid>
      <link>https://example.org/events/1</link>
    </item>
    <item>
      <title>Trivia Night</title>
      <description>Weekly trivia.</description>
      <pubDate>Wed, 12 Jun 2024 23:30:00 +0000</pubDate>
      <guid isPermaLink="false">event-2</guid>
    </item>
    <item>
      <title>Art Walk</title>
      <description>Downtown galleries.</description>
      <pubDate>Fri, 14 Jun 2024 17:00:00 +0000</pubDate>
      <guid isPermaLink="false">event-3</guid>
    </item>
  </channel>
</rss>"#;

fn central() -> Tz {
    "America/Chicago".parse().unwrap()
}

#[test]
fn test_parse_feed_finds_items() {
    let feed = parse_feed(SAMPLE_FEED).unwrap();
    assert_eq!(feed.channel.items.len(), 3);
    assert_eq!(feed.channel.items[0].guid.value, "event-1");
    assert_eq!(
        feed.channel.items[0].link.as_deref(),
        Some("https://example.org/events/1")
    );
}

#[test]
fn test_parse_feed_rejects_malformed_xml() {
    let result = parse_feed("<rss><channel><item></rss>");
    assert!(matches!(result, Err(Error::FeedParse(_))));
}

#[test]
fn test_clean_text_normalizes_entities_and_whitespace() {
    assert_eq!(clean_text("Farmers&nbsp;Market"), "Farmers Market");
    assert_eq!(clean_text("  a \n\t b  "), "a b");
    assert_eq!(clean_text("plain"), "plain");
}

#[test]
fn test_clean_text_is_idempotent() {
    let inputs = [
        "  Farmers&nbsp;&nbsp;Market \n",
        "no changes needed",
        "\u{a0}leading nbsp",
        "",
    ];
    for input in inputs {
        let once = clean_text(input);
        let twice = clean_text(&once);
        assert_eq!(once, twice, "clean_text not idempotent for {:?}", input);
    }
}

#[test]
fn test_grouping_by_calendar_day() {
    let feed = parse_feed(SAMPLE_FEED).unwrap();
    let groups = normalize_and_group(feed, central()).unwrap();

    // 18:00 and 23:30 UTC on Jun 12 are both Jun 12 in Central time
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].title, "Wed Jun 12 2024");
    assert_eq!(groups[0].items.len(), 2);
    assert_eq!(groups[1].title, "Fri Jun 14 2024");
    assert_eq!(groups[1].items.len(), 1);

    // Every item lands in exactly one group
    let total: usize = groups.iter().map(|g| g.items.len()).sum();
    assert_eq!(total, 3);
}

#[test]
fn test_grouping_pins_timezone() {
    // 03:30 UTC on Jun 13 is still the evening of Jun 12 in Central time
    let xml = r#"<rss><channel>
      <item>
        <title>Late Show</title>
        <description>d</description>
        <pubDate>Thu, 13 Jun 2024 03:30:00 +0000</pubDate>
        <guid>late-1</guid>
      </item>
    </channel></rss>"#;

    let groups = normalize_and_group(parse_feed(xml).unwrap(), central()).unwrap();
    assert_eq!(groups[0].title, "Wed Jun 12 2024");
}

#[test]
fn test_normalization_canonicalizes_pub_date() {
    let feed = parse_feed(SAMPLE_FEED).unwrap();
    let groups = normalize_and_group(feed, central()).unwrap();

    let event = &groups[0].items[0];
    assert_eq!(event.pub_date, "2024-06-12T18:00:00Z");
    assert_eq!(event.title, "Farmers Market");
    assert_eq!(event.description, "Fresh produce and more.");
}

#[test]
fn test_groups_keep_first_seen_order() {
    // Feed order is not chronological; groups must follow first occurrence
    let xml = r#"<rss><channel>
      <item>
        <title>Later</title><description>d</description>
        <pubDate>Sat, 15 Jun 2024 12:00:00 +0000</pubDate>
        <guid>a</guid>
      </item>
      <item>
        <title>Earlier</title><description>d</description>
        <pubDate>Mon, 10 Jun 2024 12:00:00 +0000</pubDate>
        <guid>b</guid>
      </item>
      <item>
        <title>Later again</title><description>d</description>
        <pubDate>Sat, 15 Jun 2024 15:00:00 +0000</pubDate>
        <guid>c</guid>
      </item>
    </channel></rss>"#;

    let groups = normalize_and_group(parse_feed(xml).unwrap(), central()).unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].title, "Sat Jun 15 2024");
    assert_eq!(groups[1].title, "Mon Jun 10 2024");
    assert_eq!(groups[0].items.len(), 2);
}

#[test]
fn test_malformed_pub_date_fails_naming_guid() {
    let xml = r#"<rss><channel>
      <item>
        <title>Bad date</title><description>d</description>
        <pubDate>sometime next week</pubDate>
        <guid>broken-item</guid>
      </item>
    </channel></rss>"#;

    let result = normalize_and_group(parse_feed(xml).unwrap(), central());
    match result {
        Err(Error::DateParse { guid, .. }) => assert_eq!(guid, "broken-item"),
        other => panic!("expected DateParse error, got {:?}", other.map(|g| g.len())),
    }
}
