//! Discovers RSS feeds linked from websites.
//!
//! Seed pages are scanned for feed-looking anchors, each candidate page is
//! fetched, and the feed links on it are confirmed by their `content-type`.
//! See [`feed::Scout`] for the entry point.

pub mod config;
pub mod feed;
pub mod util;
