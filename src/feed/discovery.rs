use super::fetcher::{Fetcher, DEFAULT_MAX_BODY_BYTES};
use super::matchers::{default_matchers, SiteMatcher};
use super::sniffer::sniff;
use super::types::Feed;
use super::wellknown::probe;
use crate::util::{parse_target, site_root, without_query, TargetError};
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use url::Url;

/// User agent sent when the caller does not set one.
pub const DEFAULT_USER_AGENT: &str = concat!("feedscout/", env!("CARGO_PKG_VERSION"));

/// Errors that abort a discovery run.
///
/// Everything else (unreachable hosts, bad documents, unmatched patterns)
/// is absorbed and only visible in the logs.
#[derive(Debug, Error)]
pub enum FindError {
    /// The target is not an absolute http(s) URL
    #[error("invalid target URL: {0}")]
    InvalidTarget(#[from] TargetError),
    /// The proxy setting is not a usable proxy URL
    #[error("invalid proxy URL: {0}")]
    InvalidProxy(String),
    /// The HTTP client could not be constructed (TLS backend, resolver)
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Per-call settings for [`find_feeds`].
///
/// The proxy is held as a secret since proxy URLs often embed credentials;
/// it never appears in `Debug` output or logs.
pub struct FindOptions {
    /// Upstream proxy for every request of the run. Empty means none.
    pub proxy: Option<SecretString>,
    /// Per-request timeout. `None` leaves deadlines to the cancellation token.
    pub timeout: Option<Duration>,
    pub user_agent: String,
    /// Largest response body read from any single URL
    pub max_body_bytes: usize,
    /// Cancels every in-flight and future request of the run
    pub cancel: CancellationToken,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            proxy: None,
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            cancel: CancellationToken::new(),
        }
    }
}

impl FindOptions {
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(SecretString::from(proxy.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

impl std::fmt::Debug for FindOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FindOptions")
            .field("proxy", &self.proxy.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

/// Discovers the feeds reachable from `target`.
///
/// Site-specific matchers run first, in order; the first one that
/// recognizes the URL decides the answer. Otherwise the page's HTML hints
/// and the well-known feed paths are checked concurrently and their results
/// merged, one entry per distinct link.
///
/// The order of the returned feeds is unspecified.
///
/// # Errors
///
/// Only structural misuse fails the call:
/// - [`FindError::InvalidTarget`] if `target` is not an absolute http(s) URL
/// - [`FindError::InvalidProxy`] if `options.proxy` does not parse
/// - [`FindError::Client`] if the HTTP client cannot be built
///
/// These checks happen before any network activity. A site with no feeds
/// yields `Ok(vec![])`.
pub async fn find_feeds(target: &str, options: &FindOptions) -> Result<Vec<Feed>, FindError> {
    let target = parse_target(target)?;
    let client = build_client(options)?;
    let fetcher = Fetcher::new(client)
        .with_cancellation(options.cancel.clone())
        .with_max_body_bytes(options.max_body_bytes);

    Ok(Finder::new(target, fetcher).run().await)
}

/// Builds the transport for one run from the caller's options.
///
/// # Errors
///
/// Returns [`FindError::InvalidProxy`] for an unparseable proxy URL and
/// [`FindError::Client`] if `reqwest` cannot initialize.
pub fn build_client(options: &FindOptions) -> Result<reqwest::Client, FindError> {
    let mut builder = reqwest::Client::builder()
        .user_agent(options.user_agent.as_str())
        .redirect(reqwest::redirect::Policy::limited(10));

    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(proxy) = options.proxy.as_ref() {
        let raw = proxy.expose_secret().trim();
        if !raw.is_empty() {
            // Parse errors are reported without the URL, which may hold credentials
            let proxy_url = Url::parse(raw).map_err(|e| FindError::InvalidProxy(e.to_string()))?;
            if proxy_url.host_str().map_or(true, str::is_empty) {
                return Err(FindError::InvalidProxy("proxy URL has no host".to_owned()));
            }
            let proxy = reqwest::Proxy::all(proxy_url.as_str())
                .map_err(|_| FindError::InvalidProxy("unsupported proxy URL".to_owned()))?;
            builder = builder.proxy(proxy);
        }
    }

    builder.build().map_err(FindError::Client)
}

/// One discovery run over a parsed target.
///
/// `find_feeds` covers the common case; `Finder` exists for callers that
/// bring their own [`Fetcher`] or matcher chain.
pub struct Finder {
    target: Url,
    fetcher: Fetcher,
    matchers: Vec<Box<dyn SiteMatcher>>,
}

impl Finder {
    pub fn new(target: Url, fetcher: Fetcher) -> Self {
        Self {
            target,
            fetcher,
            matchers: default_matchers(),
        }
    }

    /// Replaces the matcher chain. Order is precedence.
    pub fn with_matchers(mut self, matchers: Vec<Box<dyn SiteMatcher>>) -> Self {
        self.matchers = matchers;
        self
    }

    pub async fn run(&self) -> Vec<Feed> {
        let from_sites = self.try_site_matchers().await;
        if !from_sites.is_empty() {
            return from_sites;
        }

        let (hinted, probed) = tokio::join!(self.try_page_hints(), self.try_well_known());

        tracing::debug!(
            url = %self.target,
            hinted = hinted.len(),
            probed = probed.len(),
            "Fallback strategies finished"
        );
        merge_feeds([hinted, probed])
    }

    /// Runs the matcher chain; the first non-empty answer wins.
    async fn try_site_matchers(&self) -> Vec<Feed> {
        for matcher in &self.matchers {
            match matcher.find(&self.target, &self.fetcher).await {
                Ok(feeds) if !feeds.is_empty() => {
                    tracing::debug!(
                        matcher = matcher.name(),
                        count = feeds.len(),
                        "Site matcher recognized target"
                    );
                    return feeds;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(matcher = matcher.name(), error = %e, "Site matcher failed, skipping");
                }
            }
        }
        Vec::new()
    }

    async fn try_page_hints(&self) -> Vec<Feed> {
        match sniff(&self.fetcher, &self.target).await {
            Ok(feeds) => feeds,
            Err(e) => {
                tracing::debug!(url = %self.target, error = %e, "Failed to sniff HTML for feed hints");
                Vec::new()
            }
        }
    }

    /// Well-known paths under the target's own path, then under the site
    /// root if that found nothing.
    async fn try_well_known(&self) -> Vec<Feed> {
        let base = without_query(&self.target);
        let feeds = probe(&self.fetcher, &base).await;
        if !feeds.is_empty() {
            return feeds;
        }

        let root = site_root(&self.target);
        if root == base {
            return feeds;
        }
        tracing::debug!(root = %root, "Nothing under target path, probing site root");
        probe(&self.fetcher, &root).await
    }
}

/// Folds strategy outputs into one list with at most one feed per link.
///
/// Later batches overwrite earlier ones on the same link; the result order
/// is unspecified.
fn merge_feeds<I>(batches: I) -> Vec<Feed>
where
    I: IntoIterator<Item = Vec<Feed>>,
{
    let mut by_link: HashMap<String, Feed> = HashMap::new();
    for feed in batches.into_iter().flatten() {
        by_link.insert(feed.link.clone(), feed);
    }
    by_link.into_values().collect()
}
