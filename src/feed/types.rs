use serde::{Deserialize, Serialize};

/// A discovered syndication feed.
///
/// Two feeds are the same feed when their `link` values are byte-equal; the
/// title is only a label and never takes part in identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    /// Human-readable label, may be empty
    pub title: String,
    /// Absolute URL of the feed document
    pub link: String,
}

impl Feed {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }

    /// True for the "no feed found" sentinel (both fields empty).
    ///
    /// A feed with a link but no title is not empty.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.link.is_empty()
    }
}
