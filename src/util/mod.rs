//! Utility functions shared by the discovery strategies and the CLI.
//!
//! - **URL handling**: target parsing, site-root derivation, path joining for
//!   well-known suffixes, href resolution, host matching
//! - **Text processing**: sanitizing remote titles and width-aware padding
//!
//! # Examples
//!
//! ```
//! use feedscout::util::{join_path, parse_target, site_root};
//!
//! let target = parse_target("https://example.com/blog/post-1?ref=home").unwrap();
//! let root = site_root(&target);
//! assert_eq!(join_path(&root, "feed.xml").as_str(), "https://example.com/feed.xml");
//! ```

mod links;
mod text;

pub use self::links::{
    host_matches, join_path, parse_target, path_segments, resolve_href, site_root,
    without_query, TargetError,
};
pub use self::text::{display_width, fit_to_width, sanitize_title};
