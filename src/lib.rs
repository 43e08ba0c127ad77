//! Discover syndication feeds (RSS, Atom, JSON Feed) from any page or
//! profile URL.
//!
//! ```ignore
//! use feedscout::{find_feeds, FindOptions};
//!
//! let feeds = find_feeds("https://reddit.com/r/rust", &FindOptions::default()).await?;
//! assert_eq!(feeds.len(), 4);
//! ```

pub mod config;
pub mod feed;
pub mod util;

pub use feed::{find_feeds, Feed, FindError, FindOptions};
