//! Tolerant RSS/Atom document parsing.
//!
//! Feeds are third-party and uncontrolled: tag casing drifts (`ITEM`,
//! `PubDate`), namespaced names appear (`job_listing:company`), end tags go
//! missing, and blocked requests come back as HTML. The reader here is
//! deliberately liberal about structure (any `<item>` or `<entry>` element,
//! matched case-insensitively anywhere in the document, becomes a raw item)
//! while being precise about *why* a body produced nothing, since that
//! diagnosis drives operator action.

use jobfeed_common::{ImportError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// One captured child element of a feed item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawField {
    /// Qualified tag name as it appeared, e.g. `content:encoded`
    pub name: String,
    /// Concatenated text and CDATA content of the element's subtree
    pub text: String,
    /// Value of an `href` attribute, if the element carried one
    pub href: Option<String>,
}

/// One `<item>`/`<entry>` element, flattened to its direct children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawItem {
    pub fields: Vec<RawField>,
}

impl RawItem {
    /// First field whose qualified name matches `name` case-insensitively.
    pub fn field(&self, name: &str) -> Option<&RawField> {
        self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// First non-empty text among the given name aliases, tried in order.
    pub fn first_text(&self, aliases: &[&str]) -> Option<&str> {
        aliases.iter().find_map(|alias| {
            self.field(alias)
                .map(|f| f.text.trim())
                .filter(|t| !t.is_empty())
        })
    }
}

fn is_item_tag(local: &str) -> bool {
    local.eq_ignore_ascii_case("item") || local.eq_ignore_ascii_case("entry")
}

fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack.len() >= prefix.len() && haystack[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Whether the body at least begins like an XML feed document.
pub(crate) fn looks_like_xml(body: &str) -> bool {
    starts_with_ignore_case(body, "<?xml")
        || starts_with_ignore_case(body, "<rss")
        || starts_with_ignore_case(body, "<feed")
}

fn qualified_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn local_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}

fn href_attribute(start: &BytesStart<'_>) -> Option<String> {
    // with_checks(false): some feeds carry attributes without values, which
    // the strict attribute reader rejects
    start
        .attributes()
        .with_checks(false)
        .flatten()
        .find(|attr| attr.key.local_name().as_ref().eq_ignore_ascii_case(b"href"))
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Parse a feed body into raw items, or a classified failure.
///
/// Classification is exhaustive: a `Ok(items)` result always has at least
/// one item; every zero-candidate outcome is a distinct `FeedFormat` error.
pub fn parse_feed(body: &str) -> Result<Vec<RawItem>> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(ImportError::empty_feed());
    }
    if starts_with_ignore_case(trimmed, "<!doctype") || starts_with_ignore_case(trimmed, "<html") {
        return Err(ImportError::html_not_xml());
    }

    let items = collect_items(trimmed)?;

    if items.is_empty() {
        return Err(if looks_like_xml(trimmed) {
            ImportError::no_items(
                "feed was received but no <item> or <entry> elements were found; \
                 the feed format may differ from expected",
            )
        } else {
            ImportError::no_items(format!(
                "feed returned no job items (received {} characters)",
                trimmed.len()
            ))
        });
    }

    Ok(items)
}

fn collect_items(body: &str) -> Result<Vec<RawItem>> {
    let mut reader = Reader::from_str(body);
    // end-tag names are not verified; feeds with sloppy nesting still parse
    reader.config_mut().check_end_names = false;

    let mut items: Vec<RawItem> = Vec::new();
    // open-element count; the item element sits at index `item_depth`
    let mut depth: usize = 0;
    let mut item_depth: usize = 0;
    let mut current_item: Option<RawItem> = None;
    let mut current_field: Option<RawField> = None;

    loop {
        match reader.read_event() {
            Err(err) => return Err(ImportError::invalid_xml(err)),
            Ok(Event::Eof) => break,
            Ok(Event::Start(start)) => {
                if current_item.is_none() {
                    if is_item_tag(&local_name(&start)) {
                        current_item = Some(RawItem::default());
                        item_depth = depth;
                    }
                } else if depth == item_depth + 1 {
                    current_field = Some(RawField {
                        name: qualified_name(&start),
                        text: String::new(),
                        href: href_attribute(&start),
                    });
                }
                depth += 1;
            }
            Ok(Event::Empty(start)) => {
                if let Some(item) = current_item.as_mut() {
                    if depth == item_depth + 1 {
                        item.fields.push(RawField {
                            name: qualified_name(&start),
                            text: String::new(),
                            href: href_attribute(&start),
                        });
                    }
                } else if is_item_tag(&local_name(&start)) {
                    items.push(RawItem::default());
                }
            }
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                if current_item.is_some() {
                    if depth == item_depth + 1 {
                        if let (Some(item), Some(mut field)) =
                            (current_item.as_mut(), current_field.take())
                        {
                            field.text = field.text.trim().to_string();
                            item.fields.push(field);
                        }
                    } else if depth == item_depth {
                        if let Some(item) = current_item.take() {
                            items.push(item);
                        }
                        current_field = None;
                    }
                }
            }
            Ok(Event::Text(text)) => {
                if let Some(field) = current_field.as_mut() {
                    match text.unescape() {
                        Ok(decoded) => field.text.push_str(&decoded),
                        // bad entities are kept raw rather than failing the feed
                        Err(_) => field
                            .text
                            .push_str(&String::from_utf8_lossy(text.as_ref())),
                    }
                }
            }
            Ok(Event::CData(cdata)) => {
                if let Some(field) = current_field.as_mut() {
                    field
                        .text
                        .push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                }
            }
            Ok(_) => {}
        }
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobfeed_common::FeedFormatKind;

    fn format_kind(err: ImportError) -> FeedFormatKind {
        match err {
            ImportError::FeedFormat { kind, .. } => kind,
            other => panic!("expected FeedFormat, got {other:?}"),
        }
    }

    #[test]
    fn empty_body_is_classified() {
        assert_eq!(
            format_kind(parse_feed("   \n ").unwrap_err()),
            FeedFormatKind::EmptyFeed
        );
    }

    #[test]
    fn html_block_page_is_classified() {
        let body = "<!DOCTYPE html><html><body>Access denied</body></html>";
        assert_eq!(
            format_kind(parse_feed(body).unwrap_err()),
            FeedFormatKind::HtmlNotXml
        );
        assert_eq!(
            format_kind(parse_feed("<HTML><body>blocked</body></HTML>").unwrap_err()),
            FeedFormatKind::HtmlNotXml
        );
    }

    #[test]
    fn truncated_markup_is_invalid_xml() {
        // body ends inside an open tag, which the reader rejects outright
        let err = parse_feed("<?xml version=\"1.0\"?><rss><channel><item").unwrap_err();
        assert_eq!(format_kind(err), FeedFormatKind::InvalidXml);
    }

    #[test]
    fn valid_feed_without_items_reports_no_items_with_feed_message() {
        let body = "<?xml version=\"1.0\"?><rss><channel><title>empty</title></channel></rss>";
        match parse_feed(body).unwrap_err() {
            ImportError::FeedFormat { kind, message } => {
                assert_eq!(kind, FeedFormatKind::NoItems);
                assert!(message.contains("no <item> or <entry>"));
            }
            other => panic!("expected FeedFormat, got {other:?}"),
        }
    }

    #[test]
    fn non_xml_body_reports_no_items_with_length_message() {
        let body = "just some text that is not xml";
        match parse_feed(body).unwrap_err() {
            ImportError::FeedFormat { kind, message } => {
                assert_eq!(kind, FeedFormatKind::NoItems);
                assert!(message.contains("characters"));
            }
            other => panic!("expected FeedFormat, got {other:?}"),
        }
    }

    #[test]
    fn rss_items_are_collected_case_insensitively() {
        let body = r#"<?xml version="1.0"?>
            <RSS version="2.0"><CHANNEL>
              <ITEM><TITLE>First</TITLE><LINK>https://a.example/1</LINK></ITEM>
              <item><title>Second</title></item>
            </CHANNEL></RSS>"#;
        let items = parse_feed(body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].first_text(&["title"]), Some("First"));
        assert_eq!(items[0].field("link").unwrap().text, "https://a.example/1");
    }

    #[test]
    fn atom_entries_capture_href_links() {
        let body = r#"<?xml version="1.0"?>
            <feed xmlns="http://www.w3.org/2005/Atom">
              <entry>
                <title>Rust Engineer</title>
                <link href="https://jobs.example/42" rel="alternate"/>
                <id>tag:jobs.example,2026:42</id>
              </entry>
            </feed>"#;
        let items = parse_feed(body).unwrap();
        assert_eq!(items.len(), 1);
        let link = items[0].field("link").unwrap();
        assert_eq!(link.text, "");
        assert_eq!(link.href.as_deref(), Some("https://jobs.example/42"));
    }

    #[test]
    fn cdata_and_nested_markup_flatten_into_text() {
        let body = r#"<rss><channel><item>
            <description><![CDATA[<b>Great</b> role]]></description>
            <content:encoded>More <em>detail</em> here</content:encoded>
        </item></channel></rss>"#;
        let items = parse_feed(body).unwrap();
        let description = items[0].field("description").unwrap();
        assert_eq!(description.text, "<b>Great</b> role");
        let encoded = items[0].field("content:encoded").unwrap();
        assert_eq!(encoded.text, "More detail here");
    }

    #[test]
    fn first_text_walks_aliases_in_order() {
        let body = r#"<rss><channel><item>
            <company>Fallback Inc</company>
            <job_listing:company>Preferred Ltd</job_listing:company>
        </item></channel></rss>"#;
        let items = parse_feed(body).unwrap();
        assert_eq!(
            items[0].first_text(&["job_listing:company", "job:company", "company"]),
            Some("Preferred Ltd")
        );
        assert_eq!(items[0].first_text(&["job:company"]), None);
    }
}
