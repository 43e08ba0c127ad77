use super::SiteMatcher;
use crate::feed::fetcher::{FetchError, Fetcher};
use crate::feed::types::Feed;
use crate::util::{host_matches, path_segments};
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

// GitHub's own username and repository naming rules
static USERNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][-]?[A-Za-z0-9]{0,38}$").expect("username pattern is valid")
});
static REPO_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,98}[A-Za-z0-9]$").expect("repo pattern is valid")
});

const REPO_FEED_KINDS: [&str; 4] = ["commits", "releases", "tags", "wiki"];

/// Feeds for github.com: global timeline, user activity, repository
/// commits/releases/tags/wiki.
///
/// See <https://docs.github.com/en/rest/activity/feeds>.
pub struct GitHubMatcher;

#[async_trait]
impl SiteMatcher for GitHubMatcher {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn find(&self, target: &Url, _fetcher: &Fetcher) -> Result<Vec<Feed>, FetchError> {
        Ok(github_feeds(target))
    }
}

fn github_feeds(target: &Url) -> Vec<Feed> {
    if !host_matches(target, "github.com") {
        return Vec::new();
    }

    // Anything past /user/repo (tree/main, issues, ...) still belongs to the repo.
    // Owners of repos are not checked against USERNAME: organization names
    // such as rust-lang are valid owners but fail the personal-account rule.
    match path_segments(target).as_slice() {
        [] => vec![
            Feed::new("global public timeline", "https://github.com/timeline"),
            Feed::new(
                "global security advisories",
                "https://github.com/security-advisories.atom",
            ),
        ],
        [user] if USERNAME.is_match(user) => vec![Feed::new(
            format!("{user} public timeline"),
            format!("https://github.com/{user}.atom"),
        )],
        [owner, repo, ..] if REPO_NAME.is_match(repo) => {
            REPO_FEED_KINDS
                .iter()
                .map(|kind| {
                    Feed::new(
                        format!("{owner}/{repo} {kind}"),
                        format!("https://github.com/{owner}/{repo}/{kind}.atom"),
                    )
                })
                .collect()
        }
        _ => Vec::new(),
    }
}
