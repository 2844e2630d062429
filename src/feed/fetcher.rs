use crate::util::validate_url;
use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub(crate) const DEFAULT_MAX_PAGE_BYTES: usize = 5 * 1024 * 1024; // 5MB
const MAX_REDIRECTS: usize = 3;

/// Errors that can occur while fetching a page or probing a feed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL failed validation (bad scheme, private host, unparseable)
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("request timed out")]
    Timeout,
    /// Response body exceeded the configured size limit
    #[error("response too large")]
    TooLarge,
}

/// Limits and host rules applied to every request made during a run.
#[derive(Debug, Clone)]
pub struct FetchPolicy {
    pub timeout: Duration,
    pub max_page_bytes: usize,
    /// Skip the localhost/private-address guard
    pub allow_private_hosts: bool,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_page_bytes: DEFAULT_MAX_PAGE_BYTES,
            allow_private_hosts: false,
        }
    }
}

/// An HTML page as returned by the server.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL the page was served from, after any redirects
    pub url: Url,
    /// Raw `content-type` header, if the server sent one
    pub content_type: Option<String>,
    /// Body decoded as UTF-8 (invalid sequences replaced)
    pub body: String,
}

/// Fetches a page and returns its body together with its content type.
///
/// # Errors
///
/// Returns [`FetchError`] on validation failure, network error, timeout,
/// non-2xx status, or a body larger than `policy.max_page_bytes`.
pub async fn fetch_page(
    client: &reqwest::Client,
    url: &str,
    policy: &FetchPolicy,
) -> Result<FetchedPage, FetchError> {
    let url = checked_url(url, policy)?;
    let response = send_get(client, url, policy).await?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    // Relative links on the page are relative to where it was served from
    let url = response.url().clone();
    let content_type = header_content_type(&response);
    let bytes = read_limited_bytes(response, policy.max_page_bytes).await?;

    tracing::debug!(url = %url, bytes = bytes.len(), "Fetched page");

    Ok(FetchedPage {
        url,
        content_type,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    })
}

/// Issues a GET for a suspected feed and returns only its `content-type` header.
///
/// The body is never read. A response without the header yields `Ok(None)`.
///
/// # Errors
///
/// Returns [`FetchError::HttpStatus`] for non-2xx responses, and the same
/// validation/network/timeout errors as [`fetch_page`].
pub async fn probe_content_type(
    client: &reqwest::Client,
    url: &str,
    policy: &FetchPolicy,
) -> Result<Option<String>, FetchError> {
    let url = checked_url(url, policy)?;
    let response = send_get(client, url, policy).await?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    Ok(header_content_type(&response))
}

/// Redirect policy that re-applies the URL guard to every hop.
///
/// - Limits redirects to 3 hops
/// - Rejects hops that [`validate_url`] refuses under `allow_private_hosts`
/// - Detects redirect loops (same URL appearing twice in chain)
///
/// Without it a public page could bounce requests to localhost or a private
/// address, since only the first URL is checked before sending.
pub fn redirect_policy(allow_private_hosts: bool) -> reqwest::redirect::Policy {
    reqwest::redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error(format!("Too many redirects (max {MAX_REDIRECTS})"));
        }

        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev.as_str() == url.as_str()) {
            return attempt.error("Redirect loop detected");
        }

        if let Err(e) = validate_url(url.as_str(), allow_private_hosts) {
            tracing::warn!(to = %url, error = %e, "Refusing redirect");
            return attempt.error(e);
        }

        tracing::debug!(
            from = %attempt.previous().last().map(|u| u.as_str()).unwrap_or("initial"),
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

fn checked_url(url: &str, policy: &FetchPolicy) -> Result<Url, FetchError> {
    validate_url(url, policy.allow_private_hosts).map_err(|e| FetchError::InvalidUrl(e.to_string()))
}

async fn send_get(
    client: &reqwest::Client,
    url: Url,
    policy: &FetchPolicy,
) -> Result<reqwest::Response, FetchError> {
    tokio::time::timeout(policy.timeout, client.get(url).send())
        .await
        .map_err(|_| FetchError::Timeout)?
        .map_err(FetchError::Network)
}

fn header_content_type(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Reads the response body, giving up once it grows past `limit` bytes.
async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if usize::try_from(len).map_or(true, |len| len > limit) {
            return Err(FetchError::TooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::TooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
