use super::types::Feed;
use crate::util::sanitize_title;

/// Decodes a syndication document (RSS, Atom or JSON Feed) into a [`Feed`].
///
/// This runs speculatively against whatever a URL returned: HTML error
/// pages, empty bodies, unrelated JSON. Anything `feed-rs` does not accept
/// yields `None` rather than an error.
///
/// The link is the document's `rel="self"` link when present, else its first
/// link. Callers that know which URL served the bytes should prefer that URL
/// over this one.
pub fn parse_feed_document(bytes: &[u8]) -> Option<Feed> {
    let parsed = match feed_rs::parser::parse(bytes) {
        Ok(feed) => feed,
        Err(e) => {
            tracing::trace!(error = %e, "Content is not a feed document");
            return None;
        }
    };

    let title = parsed
        .title
        .map(|t| sanitize_title(&t.content))
        .unwrap_or_default();

    let link = parsed
        .links
        .iter()
        .find(|link| link.rel.as_deref() == Some("self"))
        .or_else(|| parsed.links.first())
        .map(|link| link.href.trim().to_owned())
        .unwrap_or_default();

    Some(Feed { title, link })
}
