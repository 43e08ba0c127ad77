use super::SiteMatcher;
use crate::feed::fetcher::{FetchError, Fetcher};
use crate::feed::types::Feed;
use crate::util::{host_matches, path_segments};
use async_trait::async_trait;
use url::Url;

const SUBREDDIT_SORTS: [&str; 4] = ["hot", "new", "top", "rising"];
const USER_SORTS: [&str; 3] = ["new", "hot", "top"];

/// Feeds for reddit.com: front page, subreddits, single threads, users and
/// domain submissions.
///
/// See <https://www.reddit.com/wiki/rss/>.
pub struct RedditMatcher;

#[async_trait]
impl SiteMatcher for RedditMatcher {
    fn name(&self) -> &'static str {
        "reddit"
    }

    async fn find(&self, target: &Url, _fetcher: &Fetcher) -> Result<Vec<Feed>, FetchError> {
        Ok(reddit_feeds(target))
    }
}

fn reddit_feeds(target: &Url) -> Vec<Feed> {
    if !host_matches(target, "reddit.com") {
        return Vec::new();
    }

    match path_segments(target).as_slice() {
        [] => vec![Feed::new("global", "https://www.reddit.com/.rss")],
        // comments/{post}/{title}[/comment/{id}]
        ["r", _, rest, ..] if rest.starts_with("comments") => thread_feed(target),
        ["r", sub, ..] => subreddit_feeds(sub),
        ["user", name, ..] => user_feeds(name),
        ["domain", domain, ..] => vec![Feed::new(
            format!("/domain/{domain}"),
            format!("https://reddit.com/domain/{domain}/.rss"),
        )],
        _ => Vec::new(),
    }
}

fn subreddit_feeds(sub: &str) -> Vec<Feed> {
    SUBREDDIT_SORTS
        .iter()
        .map(|sort| {
            Feed::new(
                format!("/r/{sub} {sort}"),
                format!("https://reddit.com/r/{sub}/{sort}/.rss"),
            )
        })
        .collect()
}

/// A thread's feed is the thread URL itself with `.rss` appended.
fn thread_feed(target: &Url) -> Vec<Feed> {
    vec![Feed::new("post", format!("{}.rss", target.as_str()))]
}

fn user_feeds(name: &str) -> Vec<Feed> {
    let sections = [("overview", ""), ("post", "submitted/"), ("comments", "comments/")];

    let mut feeds: Vec<Feed> = sections
        .iter()
        .flat_map(|(label, section)| {
            USER_SORTS.iter().map(move |sort| {
                Feed::new(
                    format!("/u/{name} {label} {sort}"),
                    format!("https://reddit.com/user/{name}/{section}.rss?sort={sort}"),
                )
            })
        })
        .collect();

    feeds.push(Feed::new(
        format!("/u/{name} awards received (legacy)"),
        format!("https://old.reddit.com/user/{name}/gilded/.rss"),
    ));
    feeds
}
