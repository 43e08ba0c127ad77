use super::fetcher::Fetcher;
use super::parser::parse_feed_document;
use super::types::Feed;
use crate::util::join_path;
use url::Url;

/// Conventional feed locations, probed in this order.
pub const WELL_KNOWN_SUFFIXES: [&str; 10] = [
    "atom.xml",
    "feed.xml",
    "rss.xml",
    "index.xml",
    "atom.json",
    "feed.json",
    "rss.json",
    "index.json",
    "feed/",
    "rss/",
];

/// Probes every well-known suffix under `base` and returns each one that
/// served a feed document.
///
/// Never fails: fetch and decode errors are logged and the suffix is
/// skipped. Every suffix is tried even after a hit, since sites often
/// publish several flavors (RSS and Atom, XML and JSON).
///
/// The link of each accepted feed is the probed URL, not the link embedded
/// in the document. Embedded links are often relative, stale, or point at
/// a canonical domain other than the one that actually answered.
pub async fn probe(fetcher: &Fetcher, base: &Url) -> Vec<Feed> {
    let mut feeds = Vec::new();

    for suffix in WELL_KNOWN_SUFFIXES {
        if fetcher.is_cancelled() {
            tracing::debug!(base = %base, "Well-known probing cancelled");
            break;
        }

        let candidate = join_path(base, suffix);
        let bytes = match fetcher.get(candidate.as_str()).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::trace!(url = %candidate, error = %e, "Well-known path not available");
                continue;
            }
        };

        match parse_feed_document(&bytes) {
            Some(feed) if !feed.is_empty() => {
                tracing::debug!(url = %candidate, title = %feed.title, "Found feed at well-known path");
                feeds.push(Feed {
                    title: feed.title,
                    link: candidate.to_string(),
                });
            }
            _ => {
                tracing::trace!(url = %candidate, "Well-known path did not serve a feed");
            }
        }
    }

    feeds
}
