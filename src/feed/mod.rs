//! RSS feed discovery.
//!
//! A run moves every seed page through four steps:
//!
//! - [`extract`] - pick feed-looking anchors out of HTML (`scraper`)
//! - [`resolve`] - turn each `href` into an absolute URL
//! - [`verify`] - fetch candidate pages and confirm the feeds they link to by
//!   `content-type`
//! - [`scout`] - drive the steps above and collect the result set
//!
//! All HTTP goes through [`fetcher`], which applies the timeout, body size cap
//! and private-host guard from [`FetchPolicy`].
//!
//! # Example
//!
//! ```ignore
//! use feedscout::feed::{FetchPolicy, Scout};
//!
//! let scout = Scout::new(reqwest::Client::new(), FetchPolicy::default());
//! let report = scout.run(&seeds).await;
//! ```

pub mod extract;
pub mod fetcher;
pub mod resolve;
pub mod scout;
pub mod verify;

pub use extract::{extract_feed_anchors, extract_nested_feed_links, FeedAnchor};
pub use fetcher::{
    fetch_page, probe_content_type, redirect_policy, FetchError, FetchPolicy, FetchedPage,
};
pub use resolve::{resolve_candidate, site_root};
pub use scout::{Scout, ScoutFailure, ScoutReport, DEFAULT_SEED};
pub use verify::{is_feed_content_type, FeedVerifier};
