//! Error types for feed imports
//!
//! Every user-visible failure carries a stable machine-readable
//! classification next to its free-text detail, so presentation layers can
//! map codes to safe messages without parsing error strings.

use thiserror::Error;

/// Result type alias for import operations
pub type Result<T> = std::result::Result<T, ImportError>;

/// Why a fetched feed body produced zero candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormatKind {
    /// Response body was blank
    EmptyFeed,
    /// Body starts with an HTML/doctype marker, the host served a block page
    HtmlNotXml,
    /// The XML parser rejected the body
    InvalidXml,
    /// Well-formed document with no item/entry elements
    NoItems,
}

impl FeedFormatKind {
    /// Stable machine-readable code for this kind.
    pub fn code(self) -> &'static str {
        match self {
            FeedFormatKind::EmptyFeed => "EMPTY_FEED",
            FeedFormatKind::HtmlNotXml => "HTML_NOT_XML",
            FeedFormatKind::InvalidXml => "INVALID_XML",
            FeedFormatKind::NoItems => "NO_ITEMS",
        }
    }
}

impl std::fmt::Display for FeedFormatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Main error type for the import pipeline
#[derive(Error, Debug)]
pub enum ImportError {
    /// Network, timeout or HTTP-status failure while fetching a feed
    #[error("feed fetch failed for {url}: {message}")]
    FeedFetch { url: String, message: String },

    /// The feed body could not be turned into candidates
    #[error("{kind}: {message}")]
    FeedFormat {
        kind: FeedFormatKind,
        message: String,
    },

    /// The queue backend rejected the connection or is down
    #[error("queue unavailable: {0}")]
    QueueUnavailable(String),

    /// The queue backend is out of capacity
    #[error("queue over capacity: {0}")]
    QueueCapacity(String),

    /// Store-level failure outside the per-record bulk path
    #[error("store error: {0}")]
    Store(String),
}

impl ImportError {
    pub fn empty_feed() -> Self {
        ImportError::FeedFormat {
            kind: FeedFormatKind::EmptyFeed,
            message: "feed returned an empty response".to_string(),
        }
    }

    pub fn html_not_xml() -> Self {
        ImportError::FeedFormat {
            kind: FeedFormatKind::HtmlNotXml,
            message: "feed returned HTML instead of XML (the host may block automated requests)"
                .to_string(),
        }
    }

    pub fn invalid_xml(detail: impl std::fmt::Display) -> Self {
        ImportError::FeedFormat {
            kind: FeedFormatKind::InvalidXml,
            message: format!("feed returned invalid XML: {detail}"),
        }
    }

    pub fn no_items(message: impl Into<String>) -> Self {
        ImportError::FeedFormat {
            kind: FeedFormatKind::NoItems,
            message: message.into(),
        }
    }

    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        ImportError::FeedFetch {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Stable machine-readable classification of this error.
    pub fn classification(&self) -> &'static str {
        match self {
            ImportError::FeedFetch { .. } => "FEED_FETCH_ERROR",
            ImportError::FeedFormat { kind, .. } => kind.code(),
            ImportError::QueueUnavailable(_) => "QUEUE_UNAVAILABLE",
            ImportError::QueueCapacity(_) => "QUEUE_CAPACITY",
            ImportError::Store(_) => "STORE_ERROR",
        }
    }

    /// Whether this error means "the queue is the problem", as opposed to
    /// "this feed had nothing usable". Scheduler ticks stop on the former
    /// and keep walking sources on the latter.
    pub fn is_queue_error(&self) -> bool {
        matches!(
            self,
            ImportError::QueueUnavailable(_) | ImportError::QueueCapacity(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_is_stable() {
        assert_eq!(ImportError::empty_feed().classification(), "EMPTY_FEED");
        assert_eq!(ImportError::html_not_xml().classification(), "HTML_NOT_XML");
        assert_eq!(
            ImportError::invalid_xml("unexpected EOF").classification(),
            "INVALID_XML"
        );
        assert_eq!(
            ImportError::no_items("no items").classification(),
            "NO_ITEMS"
        );
        assert_eq!(
            ImportError::fetch("http://x", "timed out").classification(),
            "FEED_FETCH_ERROR"
        );
        assert_eq!(
            ImportError::QueueUnavailable("refused".into()).classification(),
            "QUEUE_UNAVAILABLE"
        );
        assert_eq!(
            ImportError::QueueCapacity("oom".into()).classification(),
            "QUEUE_CAPACITY"
        );
    }

    #[test]
    fn queue_errors_are_separable_from_feed_errors() {
        assert!(ImportError::QueueUnavailable("down".into()).is_queue_error());
        assert!(ImportError::QueueCapacity("full".into()).is_queue_error());
        assert!(!ImportError::empty_feed().is_queue_error());
        assert!(!ImportError::fetch("http://x", "503").is_queue_error());
    }

    #[test]
    fn display_carries_kind_and_detail() {
        let err = ImportError::invalid_xml("tag mismatch at line 3");
        let text = err.to_string();
        assert!(text.starts_with("INVALID_XML"));
        assert!(text.contains("tag mismatch at line 3"));
    }
}
