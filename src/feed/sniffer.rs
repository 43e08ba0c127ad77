use super::fetcher::{FetchError, Fetcher};
use super::parser::parse_feed_document;
use super::types::Feed;
use crate::util::{resolve_href, sanitize_title};
use url::Url;

/// MIME types that mark a `<link rel="alternate">` as a feed hint.
const FEED_TYPES: [&str; 4] = [
    "application/rss+xml",
    "application/atom+xml",
    "application/feed+json",
    "application/json",
];

/// Fetches `page` and returns the feeds it advertises.
///
/// If the page itself is a feed document, that feed is returned with the
/// page URL as its link. Otherwise the markup is scanned for
/// `<link rel="alternate">` hints of a feed type.
///
/// # Errors
///
/// Returns the [`FetchError`] if the page cannot be fetched. A page that
/// simply has no hints is `Ok(vec![])`.
pub async fn sniff(fetcher: &Fetcher, page: &Url) -> Result<Vec<Feed>, FetchError> {
    let bytes = fetcher.get(page.as_str()).await?;

    if let Some(feed) = parse_feed_document(&bytes) {
        if !feed.is_empty() {
            tracing::debug!(url = %page, "Target page is itself a feed");
            return Ok(vec![Feed {
                title: feed.title,
                link: page.to_string(),
            }]);
        }
    }

    let html = String::from_utf8_lossy(&bytes);
    let feeds = find_feed_links_in_html(&html, page);
    tracing::debug!(url = %page, hints = feeds.len(), "Scanned page for feed hints");
    Ok(feeds)
}

/// Collects every `<link>` tag with `rel` containing `alternate` and a feed
/// `type`, resolving `href` against the page URL.
///
/// Uses plain string scanning rather than an HTML parser. Attribute order
/// is free and values may be double-quoted, single-quoted or bare, as
/// minifiers emit them. Duplicate hrefs are reported once, keeping the first
/// occurrence.
fn find_feed_links_in_html(html: &str, page: &Url) -> Vec<Feed> {
    let mut feeds: Vec<Feed> = Vec::new();
    let mut search_from = 0;

    while let Some(pos) = find_ascii_ci(&html[search_from..], "<link") {
        let attrs_start = search_from + pos + "<link".len();
        search_from = attrs_start;

        // `<linkfoo>` is some other element
        if !html[attrs_start..]
            .bytes()
            .next()
            .is_some_and(|b| b.is_ascii_whitespace() || b == b'/' || b == b'>')
        {
            continue;
        }

        let Some(close) = tag_end(html, attrs_start) else {
            break;
        };
        search_from = close + 1;

        let attrs = tag_attributes(&html[attrs_start..close]);
        let attr = |name: &str| attrs.iter().find(|(n, _)| n == name).map(|(_, v)| *v);

        let rel_is_alternate = attr("rel").is_some_and(|rel| {
            rel.split_ascii_whitespace()
                .any(|r| r.eq_ignore_ascii_case("alternate"))
        });
        let type_is_feed = attr("type").is_some_and(|t| {
            let mime = t.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
            FEED_TYPES.contains(&mime.as_str())
        });
        if !rel_is_alternate || !type_is_feed {
            continue;
        }

        let Some(link) = attr("href").and_then(|href| resolve_href(page, href)) else {
            continue;
        };
        if feeds.iter().any(|f| f.link == link) {
            continue;
        }

        let title = attr("title").map(sanitize_title).unwrap_or_default();
        feeds.push(Feed { title, link });
    }

    feeds
}

/// Byte offset of the `>` closing the tag whose attributes start at `from`.
///
/// A `>` inside a quoted value does not close the tag. Quotes only open a
/// value right after `=`, so an apostrophe in a bare value is literal.
fn tag_end(html: &str, from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    let mut after_eq = false;

    for (i, &b) in html.as_bytes().iter().enumerate().skip(from) {
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'>' => return Some(i),
            b'=' => {
                after_eq = true;
                continue;
            }
            b'"' | b'\'' if after_eq => quote = Some(b),
            _ if b.is_ascii_whitespace() => continue,
            _ => {}
        }
        after_eq = false;
    }

    None
}

/// Splits the inside of a tag into `(lowercased name, raw value)` pairs.
///
/// Bare values run to the next whitespace, so `href=/feed/` keeps its
/// trailing slash. Attributes without a value get an empty one.
fn tag_attributes(tag: &str) -> Vec<(String, &str)> {
    let bytes = tag.as_bytes();
    let len = bytes.len();
    let skip_ws = |mut i: usize| {
        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        i
    };

    let mut attrs = Vec::new();
    let mut i = 0;
    while i < len {
        if bytes[i].is_ascii_whitespace() || bytes[i] == b'/' {
            i += 1;
            continue;
        }

        let name_start = i;
        while i < len && !bytes[i].is_ascii_whitespace() && !matches!(bytes[i], b'=' | b'/') {
            i += 1;
        }
        let name = tag[name_start..i].to_ascii_lowercase();

        i = skip_ws(i);
        if i >= len || bytes[i] != b'=' {
            attrs.push((name, ""));
            continue;
        }
        i = skip_ws(i + 1);

        let value = match bytes.get(i) {
            Some(&q) if q == b'"' || q == b'\'' => {
                let start = i + 1;
                let end = tag[start..].find(q as char).map_or(len, |p| start + p);
                i = end + 1;
                &tag[start..end]
            }
            Some(_) => {
                let start = i;
                while i < len && !bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                &tag[start..i]
            }
            None => "",
        };
        attrs.push((name, value));
    }

    attrs
}

fn find_ascii_ci(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn page() -> Url {
        Url::parse("https://example.com/blog/post").unwrap()
    }

    #[test]
    fn test_find_rss_link() {
        let html = r#"<html><head>
            <link rel="alternate" type="application/rss+xml" href="/feed.xml" title="RSS">
        </head><body></body></html>"#;
        let feeds = find_feed_links_in_html(html, &page());
        assert_eq!(feeds, vec![Feed::new("RSS", "https://example.com/feed.xml")]);
    }

    #[test]
    fn test_find_all_hints() {
        let html = r#"<head>
            <link rel="alternate" type="application/rss+xml" href="/rss.xml" title="Posts (RSS)">
            <link rel="alternate" type="application/atom+xml" href="https://example.com/atom.xml" title="Posts (Atom)">
            <link rel="alternate" type="application/feed+json" href="feed.json">
        </head>"#;
        let feeds = find_feed_links_in_html(html, &page());
        assert_eq!(
            feeds,
            vec![
                Feed::new("Posts (RSS)", "https://example.com/rss.xml"),
                Feed::new("Posts (Atom)", "https://example.com/atom.xml"),
                Feed::new("", "https://example.com/blog/feed.json"),
            ]
        );
    }

    #[test]
    fn test_reversed_attrs_and_single_quotes() {
        let html = r#"<LINK HREF='/comments.rss' TYPE='application/rss+xml' REL='alternate'>"#;
        let feeds = find_feed_links_in_html(html, &page());
        assert_eq!(feeds, vec![Feed::new("", "https://example.com/comments.rss")]);
    }

    #[test]
    fn test_preserves_href_case() {
        let html = r#"<link rel="alternate" type="application/rss+xml" href="/Feeds/Main.XML">"#;
        let feeds = find_feed_links_in_html(html, &page());
        assert_eq!(feeds[0].link, "https://example.com/Feeds/Main.XML");
    }

    #[test]
    fn test_ignores_non_feed_links() {
        let html = r#"<head>
            <link rel="stylesheet" href="/style.css">
            <link rel="alternate" hreflang="de" href="/de/">
            <link rel="icon" type="application/rss+xml" href="/not-alternate.xml">
        </head>"#;
        assert!(find_feed_links_in_html(html, &page()).is_empty());
    }

    #[test]
    fn test_rel_with_multiple_tokens() {
        let html = r#"<link rel="home alternate" type="application/atom+xml" href="/atom">"#;
        let feeds = find_feed_links_in_html(html, &page());
        assert_eq!(feeds.len(), 1);
    }

    #[test]
    fn test_type_with_parameters() {
        let html = r#"<link rel="alternate" type="application/rss+xml; charset=utf-8" href="/rss">"#;
        let feeds = find_feed_links_in_html(html, &page());
        assert_eq!(feeds.len(), 1);
    }

    #[test]
    fn test_duplicate_hrefs_collapse() {
        let html = r#"
            <link rel="alternate" type="application/rss+xml" href="/feed" title="First">
            <link rel="alternate" type="application/rss+xml" href="https://example.com/feed" title="Second">
        "#;
        let feeds = find_feed_links_in_html(html, &page());
        assert_eq!(feeds, vec![Feed::new("First", "https://example.com/feed")]);
    }

    #[test]
    fn test_data_href_is_not_href() {
        let html = r#"<link rel="alternate" type="application/rss+xml" data-href="/wrong" href="/right">"#;
        let feeds = find_feed_links_in_html(html, &page());
        assert_eq!(feeds[0].link, "https://example.com/right");
    }

    #[test]
    fn test_unterminated_tag() {
        let html = r#"<link rel="alternate" type="application/rss+xml" href="/feed""#;
        assert!(find_feed_links_in_html(html, &page()).is_empty());
    }

    #[test]
    fn test_unquoted_attribute_values() {
        let html = "<head><link rel=alternate type=application/rss+xml href=/index.xml title=Blog></head>";
        let feeds = find_feed_links_in_html(html, &page());
        assert_eq!(feeds, vec![Feed::new("Blog", "https://example.com/index.xml")]);
    }

    #[test]
    fn test_unquoted_href_keeps_trailing_slash() {
        let html = "<link rel=alternate type=application/atom+xml href=/feed/>";
        let feeds = find_feed_links_in_html(html, &page());
        assert_eq!(feeds, vec![Feed::new("", "https://example.com/feed/")]);
    }

    #[test]
    fn test_self_closing_tag_with_quoted_values() {
        let html = r#"<link rel="alternate" type="application/rss+xml" href="/rss" />"#;
        let feeds = find_feed_links_in_html(html, &page());
        assert_eq!(feeds, vec![Feed::new("", "https://example.com/rss")]);
    }

    #[test]
    fn test_angle_bracket_inside_quoted_title() {
        let html = r#"<link rel="alternate" title="News > Tech" type="application/rss+xml" href="/tech.xml">"#;
        let feeds = find_feed_links_in_html(html, &page());
        assert_eq!(feeds, vec![Feed::new("News > Tech", "https://example.com/tech.xml")]);
    }

    #[test]
    fn test_apostrophe_in_bare_value_is_literal() {
        let html = "<link rel=alternate title=Bob's type=application/rss+xml href=/bob.xml>";
        let feeds = find_feed_links_in_html(html, &page());
        assert_eq!(feeds, vec![Feed::new("Bob's", "https://example.com/bob.xml")]);
    }

    #[test]
    fn test_href_text_inside_title_is_not_href() {
        let html = r#"<link rel="alternate" title='see href="/wrong"' type="application/rss+xml" href="/right">"#;
        let feeds = find_feed_links_in_html(html, &page());
        assert_eq!(feeds[0].link, "https://example.com/right");
    }

    #[test]
    fn test_other_elements_starting_with_link_are_skipped() {
        let html = r#"<linkset rel="alternate" type="application/rss+xml" href="/nope">"#;
        assert!(find_feed_links_in_html(html, &page()).is_empty());
    }

    #[test]
    fn test_title_is_sanitized() {
        let html = "<link rel=\"alternate\" type=\"application/rss+xml\" href=\"/f\" title=\"  Evil\x1b[2J  Feed \">";
        let feeds = find_feed_links_in_html(html, &page());
        assert_eq!(feeds[0].title, "Evil Feed");
    }

    #[tokio::test]
    async fn test_sniff_html_page() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/post"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><head><link rel="alternate" type="application/atom+xml" href="/atom.xml" title="Atom"></head></html>"#,
            ))
            .mount(&mock_server)
            .await;

        let fetcher = Fetcher::new(reqwest::Client::new());
        let page = Url::parse(&format!("{}/post", mock_server.uri())).unwrap();
        let feeds = sniff(&fetcher, &page).await.unwrap();

        assert_eq!(
            feeds,
            vec![Feed::new("Atom", format!("{}/atom.xml", mock_server.uri()))]
        );
    }

    #[tokio::test]
    async fn test_sniff_page_that_is_a_feed() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>Direct Feed</title>
  <link>https://elsewhere.example.org/</link>
  <item><guid>1</guid><title>Post</title></item>
</channel></rss>"#;
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(rss))
            .mount(&mock_server)
            .await;

        let fetcher = Fetcher::new(reqwest::Client::new());
        let page = Url::parse(&format!("{}/feed", mock_server.uri())).unwrap();
        let feeds = sniff(&fetcher, &page).await.unwrap();

        assert_eq!(
            feeds,
            vec![Feed::new("Direct Feed", format!("{}/feed", mock_server.uri()))]
        );
    }

    #[tokio::test]
    async fn test_sniff_error_page_is_an_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let fetcher = Fetcher::new(reqwest::Client::new());
        let page = Url::parse(&mock_server.uri()).unwrap();
        let result = sniff(&fetcher, &page).await;

        assert!(matches!(result, Err(FetchError::HttpStatus(503))));
    }
}
