use super::SiteMatcher;
use crate::feed::fetcher::{FetchError, Fetcher};
use crate::feed::types::Feed;
use crate::util::host_matches;
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Channel pages embed their internal id in the page's initial data blob.
static BROWSE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{"key":"browse_id","value":"(.+?)"\}"#).expect("browse_id pattern is valid")
});

const FEEDS_ENDPOINT: &str = "https://www.youtube.com/feeds/videos.xml";

/// Feeds for YouTube channel handles (`/@name`) and playlists.
///
/// Handles need one fetch of the channel page to resolve the channel id.
/// Playlists carry their id in the `list` query parameter. Every other path
/// is rejected before any network call.
pub struct YouTubeMatcher;

/// The URL shapes this matcher can turn into a feed.
#[derive(Debug, PartialEq, Eq)]
enum Shape {
    Handle,
    Playlist,
}

fn classify(target: &Url) -> Option<Shape> {
    if !host_matches(target, "youtube.com") && !host_matches(target, "youtu.be") {
        return None;
    }

    let path = target.path();
    if path.starts_with("/@") {
        Some(Shape::Handle)
    } else if path.starts_with("/playlist") {
        Some(Shape::Playlist)
    } else {
        None
    }
}

#[async_trait]
impl SiteMatcher for YouTubeMatcher {
    fn name(&self) -> &'static str {
        "youtube"
    }

    async fn find(&self, target: &Url, fetcher: &Fetcher) -> Result<Vec<Feed>, FetchError> {
        match classify(target) {
            Some(Shape::Handle) => {
                let body = fetcher.get(target.as_str()).await?;
                let html = String::from_utf8_lossy(&body);
                Ok(channel_id(&html)
                    .map(|id| vec![Feed::new("Channel", format!("{FEEDS_ENDPOINT}?channel_id={id}"))])
                    .unwrap_or_default())
            }
            Some(Shape::Playlist) => Ok(playlist_id(target)
                .map(|id| vec![Feed::new("Playlist", format!("{FEEDS_ENDPOINT}?playlist_id={id}"))])
                .unwrap_or_default()),
            None => Ok(Vec::new()),
        }
    }
}

fn channel_id(html: &str) -> Option<&str> {
    BROWSE_ID
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|id| !id.is_empty())
}

fn playlist_id(target: &Url) -> Option<String> {
    target
        .query_pairs()
        .find(|(key, _)| key == "list")
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty())
}
