use scraper::{ElementRef, Html};

/// An element on a page that points somewhere feed-like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedAnchor {
    /// The `href` attribute exactly as written in the markup
    pub href: String,
    /// Whitespace-trimmed text content of the element
    pub text: String,
}

/// Selects anchors on a landing page that look like links to an RSS page.
///
/// An `<a>` element matches when its `href` contains `rss` or `/feed`, or when
/// its own text (direct text children, not text inside nested elements)
/// contains `RSS`. All comparisons are case-sensitive. Each element is returned
/// at most once, in document order. Anchors without an `href` are skipped.
pub fn extract_feed_anchors(html: &str) -> Vec<FeedAnchor> {
    let document = Html::parse_document(html);

    elements(&document)
        .filter(|el| el.value().name() == "a")
        .filter_map(|el| {
            let href = el.value().attr("href")?;
            let matched =
                href.contains("rss") || href.contains("/feed") || own_text(&el).contains("RSS");
            matched.then(|| anchor(&el, href))
        })
        .collect()
}

/// Selects elements on a candidate page that should point at a feed document.
///
/// Matches any element with `type="application/rss+xml"` (typically
/// `<link rel="alternate">`), and `<a>` elements whose `href` ends with `.rss`
/// or with `feed`. Elements without an `href` are skipped.
pub fn extract_nested_feed_links(html: &str) -> Vec<FeedAnchor> {
    let document = Html::parse_document(html);

    elements(&document)
        .filter_map(|el| {
            let href = el.value().attr("href")?;
            let typed_feed = el.value().attr("type") == Some("application/rss+xml");
            let feed_anchor =
                el.value().name() == "a" && (href.ends_with(".rss") || href.ends_with("feed"));
            (typed_feed || feed_anchor).then(|| anchor(&el, href))
        })
        .collect()
}

fn elements(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    document.root_element().descendants().filter_map(ElementRef::wrap)
}

/// Concatenated text nodes that are direct children of the element.
fn own_text(el: &ElementRef<'_>) -> String {
    el.children()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
        .collect()
}

fn anchor(el: &ElementRef<'_>, href: &str) -> FeedAnchor {
    FeedAnchor {
        href: href.to_owned(),
        text: el.text().collect::<String>().trim().to_owned(),
    }
}
