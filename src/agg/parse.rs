use bytes::Bytes;
use chrono::{DateTime, Utc};
use rss::Channel;

use super::fetch::FetchError;
use super::types::{NormalizedFeed, NormalizedItem};

// Strict on channel metadata (an unparsable channel means a structurally
// wrong response), permissive per item: a feed with some malformed entries
// still yields its valid ones.
pub fn parse_feed(xml: &Bytes) -> Result<NormalizedFeed, FetchError> {
    // Accepts both an <rss><channel> wrapper and a bare <channel> root.
    let channel = Channel::read_from(&xml[..])
        .map_err(|err| FetchError::Format(format!("no parsable channel: {err}")))?;

    let title = required(channel.title(), "title")?;
    let link = required(channel.link(), "link")?;
    let description = required(channel.description(), "description")?;

    let items = channel.items().iter().filter_map(normalize_item).collect();

    Ok(NormalizedFeed { title, link, description, items })
}

fn required(value: &str, field: &str) -> Result<String, FetchError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FetchError::Format(format!("channel has no {field}")));
    }
    Ok(trimmed.to_string())
}

fn normalize_item(item: &rss::Item) -> Option<NormalizedItem> {
    let title = nonempty(item.title())?;
    let link = nonempty(item.link())?;
    let description = nonempty(item.description())?;
    let pub_date = nonempty(item.pub_date())?;
    Some(NormalizedItem { title, link, description, pub_date })
}

fn nonempty(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub fn extract_published_at(pub_date: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc2822(pub_date) {
        return Some(dt.with_timezone(&Utc));
    }
    // Some feeds put an RFC3339 date in pubDate
    if let Ok(dt) = DateTime::parse_from_rfc3339(pub_date) {
        return Some(dt.with_timezone(&Utc));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_xml(items: &str) -> Bytes {
        Bytes::from(format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Blog</title>
    <link>https://b.example</link>
    <description>d</description>
    {items}
  </channel>
</rss>"#
        ))
    }

    const ITEM_A: &str = r#"<item>
      <title>A</title>
      <link>https://b.example/a</link>
      <description>x</description>
      <pubDate>Mon, 01 Jan 2024 00:00:00 GMT</pubDate>
    </item>"#;

    #[test]
    fn channel_metadata_is_kept_verbatim() {
        let feed = parse_feed(&feed_xml(ITEM_A)).unwrap();
        assert_eq!(feed.title, "Blog");
        assert_eq!(feed.link, "https://b.example");
        assert_eq!(feed.description, "d");
        assert_eq!(feed.items.len(), 1);
        assert_eq!(feed.items[0].title, "A");
        assert_eq!(feed.items[0].pub_date, "Mon, 01 Jan 2024 00:00:00 GMT");
    }

    #[test]
    fn items_missing_a_required_field_are_dropped() {
        let items = format!(
            "{ITEM_A}
            <item>
              <title></title>
              <link>https://b.example/b</link>
              <description>x</description>
              <pubDate>Mon, 01 Jan 2024 00:00:00 GMT</pubDate>
            </item>
            <item>
              <title>C</title>
              <link>https://b.example/c</link>
              <pubDate>Mon, 01 Jan 2024 00:00:00 GMT</pubDate>
            </item>"
        );
        let feed = parse_feed(&feed_xml(&items)).unwrap();
        assert_eq!(feed.items.len(), 1);
        assert_eq!(feed.items[0].link, "https://b.example/a");
    }

    #[test]
    fn a_feed_with_no_items_is_valid_and_empty() {
        let feed = parse_feed(&feed_xml("")).unwrap();
        assert!(feed.items.is_empty());
    }

    #[test]
    fn bare_channel_root_is_accepted() {
        let xml = Bytes::from(
            r#"<channel>
              <title>Blog</title>
              <link>https://b.example</link>
              <description>d</description>
            </channel>"#,
        );
        let feed = parse_feed(&xml).unwrap();
        assert_eq!(feed.title, "Blog");
    }

    #[test]
    fn missing_channel_description_is_a_format_error() {
        let xml = Bytes::from(
            r#"<rss version="2.0"><channel>
              <title>Blog</title>
              <link>https://b.example</link>
            </channel></rss>"#,
        );
        let err = parse_feed(&xml).unwrap_err();
        assert!(matches!(err, FetchError::Format(_)), "got {err:?}");
    }

    #[test]
    fn non_xml_payload_is_a_format_error() {
        let err = parse_feed(&Bytes::from_static(b"{\"not\": \"xml\"}")).unwrap_err();
        assert!(matches!(err, FetchError::Format(_)), "got {err:?}");
    }

    #[test]
    fn pub_dates_parse_rfc2822_with_rfc3339_fallback() {
        assert!(extract_published_at("Mon, 01 Jan 2024 00:00:00 GMT").is_some());
        assert!(extract_published_at("2024-01-01T00:00:00Z").is_some());
        assert!(extract_published_at("next tuesday").is_none());
    }
}
