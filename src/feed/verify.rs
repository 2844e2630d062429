use super::extract::extract_nested_feed_links;
use super::fetcher::{fetch_page, probe_content_type, FetchError, FetchPolicy};
use super::resolve::resolve_candidate;
use super::scout::ScoutReport;
use std::collections::HashSet;

/// Whether a response `content-type` identifies a feed document.
///
/// Any header mentioning `xml` counts (`application/rss+xml`, `text/xml;
/// charset=utf-8`, `application/atom+xml`, ...). A missing header is not a feed.
pub fn is_feed_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("xml"))
}

/// Confirms the feed links found on candidate pages.
///
/// Remembers every URL it has probed, so a feed linked from several candidate
/// pages costs a single request per run.
pub struct FeedVerifier<'a> {
    client: &'a reqwest::Client,
    policy: &'a FetchPolicy,
    probed: HashSet<String>,
}

impl<'a> FeedVerifier<'a> {
    pub fn new(client: &'a reqwest::Client, policy: &'a FetchPolicy) -> Self {
        Self {
            client,
            policy,
            probed: HashSet::new(),
        }
    }

    /// Fetches a candidate page and adds every confirmed feed it links to.
    ///
    /// Each nested link is resolved against `candidate_url` and probed; links
    /// whose `content-type` mentions `xml` are inserted into `report.feeds`.
    /// A probe that fails is logged and recorded in `report.failures`, and the
    /// remaining links are still checked.
    ///
    /// Returns the number of feeds newly confirmed from this page.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] only when the candidate page itself cannot be fetched.
    pub async fn verify_candidate(
        &mut self,
        candidate_url: &str,
        report: &mut ScoutReport,
    ) -> Result<usize, FetchError> {
        let page = fetch_page(self.client, candidate_url, self.policy).await?;
        let links = extract_nested_feed_links(&page.body);

        tracing::debug!(candidate = %candidate_url, links = links.len(), "Scanning candidate page");

        let mut confirmed = 0;
        for link in links {
            let Some(feed_url) = resolve_candidate(&page.url, &link.href) else {
                tracing::debug!(href = %link.href, "Skipping unfollowable link");
                continue;
            };

            if !self.probed.insert(feed_url.clone()) {
                continue;
            }

            match probe_content_type(self.client, &feed_url, self.policy).await {
                Ok(content_type) if is_feed_content_type(content_type.as_deref()) => {
                    tracing::info!(feed = %feed_url, "Confirmed feed");
                    report.feeds.insert(feed_url);
                    confirmed += 1;
                }
                Ok(content_type) => {
                    tracing::debug!(
                        url = %feed_url,
                        content_type = content_type.as_deref().unwrap_or("<none>"),
                        "Not a feed"
                    );
                }
                Err(e) => {
                    tracing::warn!(url = %feed_url, error = %e, "Feed probe failed, skipping");
                    report.record_failure(&feed_url, &e);
                }
            }
        }

        Ok(confirmed)
    }
}
