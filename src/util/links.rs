use thiserror::Error;
use url::Url;

/// Errors produced while parsing the URL a discovery run starts from.
#[derive(Error, Debug)]
pub enum TargetError {
    /// The string is not a URL at all.
    #[error("Invalid URL: {0}")]
    Parse(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host component (e.g. `http:/path`).
    #[error("URL has no host")]
    MissingHost,
}

/// Parses the input of a discovery run into an absolute http(s) URL.
///
/// # Errors
///
/// Returns [`TargetError`] if the string does not parse, uses a scheme other
/// than `http`/`https`, or lacks a host.
///
/// # Examples
///
/// ```
/// use feedscout::util::parse_target;
///
/// let url = parse_target("https://github.com/torvalds/linux").unwrap();
/// assert_eq!(url.host_str(), Some("github.com"));
///
/// assert!(parse_target("not a url").is_err());
/// assert!(parse_target("ftp://example.com").is_err());
/// ```
pub fn parse_target(input: &str) -> Result<Url, TargetError> {
    let url = Url::parse(input.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(TargetError::UnsupportedScheme(scheme.to_owned())),
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(TargetError::MissingHost);
    }

    Ok(url)
}

/// The target with query and fragment removed (`scheme://host[:port]/path`).
pub fn without_query(target: &Url) -> Url {
    let mut base = target.clone();
    base.set_query(None);
    base.set_fragment(None);
    base
}

/// The root of the target's site (`scheme://host[:port]/`).
pub fn site_root(target: &Url) -> Url {
    let mut root = without_query(target);
    root.set_path("/");
    root
}

/// Appends a relative suffix to the path of `base`, with exactly one `/`
/// between them. A trailing `/` on the suffix is kept.
///
/// ```
/// use feedscout::util::join_path;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/blog/").unwrap();
/// assert_eq!(join_path(&base, "feed/").as_str(), "https://example.com/blog/feed/");
///
/// let base = Url::parse("https://example.com/blog").unwrap();
/// assert_eq!(join_path(&base, "atom.xml").as_str(), "https://example.com/blog/atom.xml");
/// ```
pub fn join_path(base: &Url, suffix: &str) -> Url {
    let mut joined = without_query(base);
    let path = format!(
        "{}/{}",
        base.path().trim_end_matches('/'),
        suffix.trim_start_matches('/')
    );
    joined.set_path(&path);
    joined
}

/// Non-empty path segments of the target, in order.
///
/// `/torvalds/linux/` yields `["torvalds", "linux"]`; the root yields nothing.
pub fn path_segments(target: &Url) -> Vec<&str> {
    target
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

/// Whether the target's host is `domain` or one of its subdomains.
pub fn host_matches(target: &Url, domain: &str) -> bool {
    let Some(host) = target.host_str() else {
        return false;
    };
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Resolves a possibly-relative href found in a page against the page URL.
///
/// Absolute and protocol-relative hrefs go through the URL parser so the
/// result is normalized. Returns `None` for hrefs that cannot be resolved or
/// that resolve to a non-http(s) scheme (`javascript:`, `data:`, ...).
pub fn resolve_href(page: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let resolved = page.join(href).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved.to_string()),
        _ => None,
    }
}
