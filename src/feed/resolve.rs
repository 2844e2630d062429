use url::Url;

/// Scheme, host and explicit port of `url`, with no trailing slash.
///
/// `https://www.example.com/a/b?c` becomes `https://www.example.com`.
pub fn site_root(url: &Url) -> String {
    url.origin().ascii_serialization()
}

/// Turns an `href` found on the page at `base` into an absolute URL to fetch.
///
/// - Root-relative (`/rss`): the site root of `base` followed by the href
/// - Already absolute (`https://...`): returned verbatim
/// - Anything else (`feed.xml`, `../rss`, `//cdn.example.com/rss`): resolved
///   against the full page URL per RFC 3986
///
/// Returns `None` for hrefs that cannot lead to a feed: empty, fragment-only,
/// `javascript:`/`mailto:`/`tel:`/`data:` links, or anything that resolves to
/// a non-http(s) URL.
pub fn resolve_candidate(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with('/') && !href.starts_with("//") {
        return Some(format!("{}{}", site_root(base), href));
    }

    if let Ok(absolute) = Url::parse(href) {
        return is_web_scheme(&absolute).then(|| href.to_owned());
    }

    base.join(href)
        .ok()
        .filter(is_web_scheme)
        .map(String::from)
}

fn is_web_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn base(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_site_root_strips_path_and_query() {
        assert_eq!(
            site_root(&base(
                "https://www.defense.gov/DesktopModules/ArticleCS/RSS.ashx?ContentType=400&Site=945&max=10"
            )),
            "https://www.defense.gov"
        );
    }

    #[test]
    fn test_site_root_keeps_explicit_port() {
        assert_eq!(site_root(&base("http://127.0.0.1:8080/rss/")), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_site_root_drops_default_port() {
        assert_eq!(site_root(&base("https://example.com:443/")), "https://example.com");
    }

    #[test]
    fn test_root_relative_href() {
        assert_eq!(
            resolve_candidate(&base("https://example.com"), "/feed.xml").as_deref(),
            Some("https://example.com/feed.xml")
        );
    }

    #[test]
    fn test_root_relative_href_ignores_page_path_and_query() {
        assert_eq!(
            resolve_candidate(&base("https://example.com/news/?page=3"), "/rss").as_deref(),
            Some("https://example.com/rss")
        );
    }

    #[test]
    fn test_absolute_href_verbatim() {
        assert_eq!(
            resolve_candidate(&base("https://example.com"), "https://feeds.example.org/News.RSS")
                .as_deref(),
            Some("https://feeds.example.org/News.RSS")
        );
        // No normalization applied, not even a trailing slash
        assert_eq!(
            resolve_candidate(&base("https://example.com"), "https://other.com").as_deref(),
            Some("https://other.com")
        );
    }

    #[test]
    fn test_relative_href_resolved_against_page() {
        assert_eq!(
            resolve_candidate(&base("https://example.com/blog/"), "feed.xml").as_deref(),
            Some("https://example.com/blog/feed.xml")
        );
        assert_eq!(
            resolve_candidate(&base("https://example.com/blog/post"), "../rss").as_deref(),
            Some("https://example.com/rss")
        );
    }

    #[test]
    fn test_protocol_relative_href() {
        assert_eq!(
            resolve_candidate(&base("https://example.com"), "//cdn.example.com/rss").as_deref(),
            Some("https://cdn.example.com/rss")
        );
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        assert_eq!(
            resolve_candidate(&base("https://example.com"), "  /rss\n").as_deref(),
            Some("https://example.com/rss")
        );
    }

    #[test]
    fn test_unfollowable_hrefs() {
        let base = base("https://example.com/page");
        for href in [
            "",
            "#rss",
            "javascript:void(0)",
            "mailto:rss@example.com",
            "tel:+15555550100",
            "data:text/plain,rss",
            "ftp://example.com/feed.rss",
        ] {
            assert_eq!(resolve_candidate(&base, href), None, "{href:?}");
        }
    }

    proptest! {
        #[test]
        fn prop_root_relative_is_plain_concatenation(path in "(/[a-zA-Z0-9._~-]{1,20}){1,4}") {
            let resolved = resolve_candidate(&base("https://example.com"), &path).unwrap();
            prop_assert_eq!(&resolved, &format!("https://example.com{path}"));
            prop_assert!(!resolved["https://".len()..].contains("//"));
        }

        #[test]
        fn prop_absolute_href_unchanged(host in "[a-z]{1,12}", path in "(/[a-zA-Z0-9._-]{1,12}){0,3}") {
            let href = format!("https://{host}.org{path}");
            let resolved = resolve_candidate(&base("https://example.com/x/y"), &href);
            prop_assert_eq!(resolved, Some(href));
        }
    }
}
