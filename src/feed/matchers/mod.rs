//! Site-specific matchers.
//!
//! Each matcher recognizes the URL shapes of one platform and synthesizes
//! that platform's known feed URLs, usually without touching the network.
//! An empty result means "not mine"; it is never an error.
//!
//! The chain returned by [`default_matchers`] is tried in order and the first
//! non-empty answer wins. New matchers go at the end so existing sites keep
//! their precedence.

mod github;
mod reddit;
mod youtube;

use super::fetcher::{FetchError, Fetcher};
use super::types::Feed;
use async_trait::async_trait;
use url::Url;

pub use github::GitHubMatcher;
pub use reddit::RedditMatcher;
pub use youtube::YouTubeMatcher;

/// A strategy that knows the feed layout of one specific site.
#[async_trait]
pub trait SiteMatcher: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Returns the site's feeds for `target`, or an empty list when the
    /// target is not a URL shape this matcher handles.
    ///
    /// # Errors
    ///
    /// Only matchers that need a network round trip return errors; the
    /// orchestrator treats them as "not applicable".
    async fn find(&self, target: &Url, fetcher: &Fetcher) -> Result<Vec<Feed>, FetchError>;
}

/// The built-in matcher chain, in precedence order.
pub fn default_matchers() -> Vec<Box<dyn SiteMatcher>> {
    vec![
        Box::new(GitHubMatcher),
        Box::new(RedditMatcher),
        Box::new(YouTubeMatcher),
    ]
}
