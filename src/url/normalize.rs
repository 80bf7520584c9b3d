use crate::UrlError;
use url::Url;

/// Normalizes a URL string into a crawl key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Require an `http` or `https` scheme and a host
/// 3. Remove the query string
/// 4. Remove the fragment
///
/// Two URLs that differ only in query string or fragment normalize to the
/// same crawl key and are treated as the same crawl target. The host is
/// kept exactly as spelled (apart from the lowercasing the `url` crate
/// performs) so that `www.` variants remain distinguishable for the
/// same-site equivalence check.
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - Failed to parse or normalize the URL
///
/// # Examples
///
/// ```
/// use leadtrawl::url::normalize_url;
///
/// let url = normalize_url("https://example.com/about?ref=nav#team").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/about");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

/// Normalizes an already-parsed URL into a crawl key
///
/// Same rules as [`normalize_url`], for callers that already hold a `Url`
/// (e.g. link extraction after resolving an href against its base).
pub fn normalize_parsed(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

/// Prepends an explicit scheme to a bare website URL
///
/// Upstream lead sources hand out URLs like `example.com` without a
/// scheme. URLs that already carry `http://` or `https://` are returned
/// unchanged; anything else gets `http://` prepended so the first fetch
/// can follow the site's own redirect to HTTPS.
///
/// # Examples
///
/// ```
/// use leadtrawl::url::ensure_scheme;
///
/// assert_eq!(ensure_scheme("example.com"), "http://example.com");
/// assert_eq!(ensure_scheme("https://example.com"), "https://example.com");
/// ```
pub fn ensure_scheme(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}
