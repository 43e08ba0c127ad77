//! Feed discovery: find the RSS/Atom/JSON feeds reachable from a URL.
//!
//! A run tries three kinds of strategy:
//!
//! - **Site matchers**: platforms with a known feed layout (GitHub, Reddit,
//!   YouTube) get their feed URLs synthesized directly
//! - **HTML hints**: the page's `<link rel="alternate">` tags
//! - **Well-known paths**: `atom.xml`, `feed.xml`, `rss/` and friends under
//!   the target path, then under the site root
//!
//! # Architecture
//!
//! - `discovery` - The orchestrator: matcher chain, concurrent fallback, merge
//! - [`matchers`] - Site-specific matchers behind the [`SiteMatcher`] trait
//! - `sniffer` - HTML hint scanning
//! - `wellknown` - Well-known path probing
//! - `parser` - Feed document decoding via `feed-rs`
//! - `fetcher` - HTTP transport with cancellation and size limits
//!
//! # Example
//!
//! ```ignore
//! use feedscout::feed::{find_feeds, FindOptions};
//!
//! let feeds = find_feeds("https://github.com/torvalds/linux", &FindOptions::default()).await?;
//! for feed in feeds {
//!     println!("{} {}", feed.title, feed.link);
//! }
//! ```

mod discovery;
mod fetcher;
pub mod matchers;
mod parser;
mod sniffer;
mod types;
mod wellknown;

pub use discovery::{build_client, find_feeds, FindError, FindOptions, Finder, DEFAULT_USER_AGENT};
pub use fetcher::{FetchError, Fetcher, DEFAULT_MAX_BODY_BYTES};
pub use matchers::SiteMatcher;
pub use parser::parse_feed_document;
pub use sniffer::sniff;
pub use types::Feed;
pub use wellknown::{probe, WELL_KNOWN_SUFFIXES};
