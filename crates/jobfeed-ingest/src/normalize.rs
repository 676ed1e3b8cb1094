//! Mapping raw feed items to canonical job candidates.
//!
//! Field extraction tries an ordered list of name aliases case-insensitively
//! and takes the first non-empty match. Every string field is silently
//! truncated to a fixed cap; truncation is never an error.

use chrono::{DateTime, Utc};
use jobfeed_common::{JobCandidate, Result};
use serde_json::{Map, Value};

use crate::feed::{parse_feed, RawItem};
use crate::identity::derive_external_id;

/// Maximum stored length (in characters) per candidate field.
pub mod caps {
    pub const EXTERNAL_ID: usize = 512;
    pub const TITLE: usize = 1024;
    pub const DESCRIPTION: usize = 50_000;
    pub const COMPANY: usize = 512;
    pub const LOCATION: usize = 512;
    pub const LINK: usize = 2048;
}

const GUID_ALIASES: &[&str] = &["guid", "id"];
const TITLE_ALIASES: &[&str] = &["title"];
const DESCRIPTION_ALIASES: &[&str] = &["description", "content:encoded", "content", "summary"];
const COMPANY_ALIASES: &[&str] = &["job_listing:company", "job:company", "company", "creator"];
const LOCATION_ALIASES: &[&str] = &["job_listing:location", "job:location", "location"];
const DATE_ALIASES: &[&str] = &["pubDate", "published", "updated"];

/// Normalize a fetched feed body into an ordered candidate list.
///
/// Returns a classified [`FeedFormat`](jobfeed_common::ImportError::FeedFormat)
/// failure instead of ever yielding a silent empty result.
pub fn normalize_feed(body: &str, source_url: &str) -> Result<Vec<JobCandidate>> {
    let items = parse_feed(body)?;
    Ok(items
        .iter()
        .map(|item| map_item(item, source_url))
        .collect())
}

/// Map one raw item to the canonical candidate shape.
pub fn map_item(item: &RawItem, source_url: &str) -> JobCandidate {
    let guid = item.first_text(GUID_ALIASES).unwrap_or_default();
    let title = item.first_text(TITLE_ALIASES).unwrap_or_default();
    let description = item.first_text(DESCRIPTION_ALIASES).unwrap_or_default();
    let company = item.first_text(COMPANY_ALIASES).unwrap_or_default();
    let location = item.first_text(LOCATION_ALIASES).unwrap_or_default();
    let link = resolve_link(item);
    let published_at = item.first_text(DATE_ALIASES).and_then(parse_feed_date);

    JobCandidate {
        external_id: truncate(
            derive_external_id(guid, &link, title, source_url),
            caps::EXTERNAL_ID,
        ),
        source_url: source_url.to_string(),
        title: truncate(title.to_string(), caps::TITLE),
        description: truncate(description.to_string(), caps::DESCRIPTION),
        company: truncate(company.to_string(), caps::COMPANY),
        location: truncate(location.to_string(), caps::LOCATION),
        link: truncate(link, caps::LINK),
        published_at,
        raw: raw_value(item),
    }
}

/// Resolve the item link: first `<link>` element in document order wins;
/// within that element an `href` attribute takes precedence over inline
/// text when both are present.
fn resolve_link(item: &RawItem) -> String {
    let Some(field) = item.field("link") else {
        return String::new();
    };
    if let Some(href) = field.href.as_deref() {
        if !href.trim().is_empty() {
            return href.trim().to_string();
        }
    }
    field.text.trim().to_string()
}

/// Accept the date formats feeds actually emit: RFC 2822 (RSS `pubDate`)
/// and RFC 3339 (Atom `published`/`updated`). Anything else becomes `None`.
fn parse_feed_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

fn truncate(mut value: String, max_chars: usize) -> String {
    if let Some((idx, _)) = value.char_indices().nth(max_chars) {
        value.truncate(idx);
    }
    value
}

/// Preserve the captured fields as a JSON object. First occurrence of a
/// name wins, matching the extraction rules.
fn raw_value(item: &RawItem) -> Value {
    let mut map = Map::new();
    for field in &item.fields {
        if map.contains_key(&field.name) {
            continue;
        }
        let value = match (&field.href, field.text.is_empty()) {
            (Some(href), true) => serde_json::json!({ "href": href }),
            _ => Value::String(field.text.clone()),
        };
        map.insert(field.name.clone(), value);
    }
    Value::Object(map)
}
