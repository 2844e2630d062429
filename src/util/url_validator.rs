use std::net::IpAddr;
use thiserror::Error;
use url::{Host, Url};

/// Reasons a URL is refused before any request is made.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,
    /// The URL points to a private/internal IP address.
    #[error("Private IP address not allowed: {0}")]
    PrivateIp(String),
    /// The URL points to localhost.
    #[error("Localhost not allowed")]
    Localhost,
}

/// Parses a URL that is about to be fetched and checks it against the host policy.
///
/// Only `http` and `https` URLs with a host are accepted. Discovered links come
/// from arbitrary third-party HTML, so unless `allow_private_hosts` is set the
/// guard also refuses:
/// - `localhost` and loopback addresses (`127.0.0.0/8`, `::1`)
/// - private, link-local and unspecified IPv4 addresses
/// - unique-local (`fc00::/7`) and link-local (`fe80::/10`) IPv6 addresses
///
/// # Errors
///
/// Returns [`UrlValidationError`] describing the first rule the URL breaks.
///
/// # Examples
///
/// ```
/// use feedscout::util::validate_url;
///
/// let url = validate_url("https://example.com/rss", false).unwrap();
/// assert_eq!(url.host_str(), Some("example.com"));
///
/// assert!(validate_url("http://192.168.1.1/rss", false).is_err());
/// assert!(validate_url("http://127.0.0.1:8080/rss", true).is_ok());
/// assert!(validate_url("ftp://example.com/rss", true).is_err());
/// ```
pub fn validate_url(url_str: &str, allow_private_hosts: bool) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    let host = url.host().ok_or(UrlValidationError::MissingHost)?;

    if allow_private_hosts {
        return Ok(url);
    }

    let ip: IpAddr = match host {
        Host::Domain(domain) if domain.eq_ignore_ascii_case("localhost") => {
            return Err(UrlValidationError::Localhost);
        }
        Host::Domain(_) => return Ok(url),
        Host::Ipv4(v4) => v4.into(),
        Host::Ipv6(v6) => v6.into(),
    };

    if ip.is_loopback() {
        return Err(UrlValidationError::Localhost);
    }
    if is_private_ip(&ip) {
        return Err(UrlValidationError::PrivateIp(ip.to_string()));
    }

    Ok(url)
}

fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_link_local() || v4.is_unspecified(),
        IpAddr::V6(v6) => {
            let first = v6.segments()[0];
            v6.is_unspecified() || (first & 0xfe00) == 0xfc00 || (first & 0xffc0) == 0xfe80
        }
    }
}
