use super::extract::extract_feed_anchors;
use super::fetcher::{fetch_page, FetchError, FetchPolicy};
use super::resolve::resolve_candidate;
use super::verify::FeedVerifier;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

/// Landing page inspected when no seeds are configured.
pub const DEFAULT_SEED: &str =
    "https://www.defense.gov/DesktopModules/ArticleCS/RSS.ashx?ContentType=400&Site=945&max=10";

/// A URL that was skipped because fetching or probing it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoutFailure {
    pub url: String,
    pub error: String,
}

/// Outcome of a discovery run.
///
/// `feeds` holds every confirmed feed URL exactly once. Failures are
/// best-effort bookkeeping: a failed seed or candidate never aborts the run.
#[derive(Debug, Default, Serialize)]
pub struct ScoutReport {
    pub feeds: BTreeSet<String>,
    pub failures: Vec<ScoutFailure>,
}

impl ScoutReport {
    pub(crate) fn record_failure(&mut self, url: &str, error: &FetchError) {
        self.failures.push(ScoutFailure {
            url: url.to_owned(),
            error: error.to_string(),
        });
    }
}

/// Walks seed pages, follows feed-looking anchors and collects confirmed feeds.
///
/// Requests are issued one at a time, in seed order then document order.
///
/// # Example
///
/// ```ignore
/// let scout = Scout::new(reqwest::Client::new(), FetchPolicy::default());
/// let report = scout.run(&["https://example.com".to_owned()]).await;
/// for feed in &report.feeds {
///     println!("{feed}");
/// }
/// ```
pub struct Scout {
    client: reqwest::Client,
    policy: FetchPolicy,
}

impl Scout {
    pub fn new(client: reqwest::Client, policy: FetchPolicy) -> Self {
        Self { client, policy }
    }

    /// Discovers feeds reachable from every seed and returns them with any failures.
    pub async fn run(&self, seeds: &[String]) -> ScoutReport {
        let mut report = ScoutReport::default();
        let mut verifier = FeedVerifier::new(&self.client, &self.policy);
        let mut visited = HashSet::new();

        for seed in seeds {
            if let Err(e) = self
                .scout_seed(seed, &mut verifier, &mut visited, &mut report)
                .await
            {
                tracing::warn!(seed = %seed, error = %e, "Seed fetch failed, skipping");
                report.record_failure(seed, &e);
            }
        }

        tracing::info!(
            seeds = seeds.len(),
            candidates = visited.len(),
            feeds = report.feeds.len(),
            failures = report.failures.len(),
            "Discovery run complete"
        );

        report
    }

    async fn scout_seed(
        &self,
        seed: &str,
        verifier: &mut FeedVerifier<'_>,
        visited: &mut HashSet<String>,
        report: &mut ScoutReport,
    ) -> Result<(), FetchError> {
        let page = fetch_page(&self.client, seed, &self.policy).await?;
        let anchors = extract_feed_anchors(&page.body);

        tracing::debug!(seed = %seed, anchors = anchors.len(), "Extracted candidate anchors");

        for anchor in anchors {
            let Some(candidate) = resolve_candidate(&page.url, &anchor.href) else {
                tracing::debug!(href = %anchor.href, "Skipping unfollowable anchor");
                continue;
            };

            // Landing pages often link the same RSS page from header and footer
            if !visited.insert(candidate.clone()) {
                continue;
            }

            if let Err(e) = verifier.verify_candidate(&candidate, report).await {
                tracing::warn!(candidate = %candidate, error = %e, "Candidate fetch failed, skipping");
                report.record_failure(&candidate, &e);
            }
        }

        Ok(())
    }
}
