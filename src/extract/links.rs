use crate::url::{extract_host, normalize_parsed, same_site};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use url::Url;

/// Matches quoted href attribute values, case-insensitively.
static HREF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)href\s*=\s*["']([^"']*)["']"#).unwrap());

/// Path extensions that never lead to a crawlable page.
const SKIPPED_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".svg", ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt",
    ".pptx", ".zip", ".rar", ".mp4", ".mp3", ".avi", ".mov", ".wmv", ".flv", ".mkv", ".css",
    ".js", ".ico", ".woff", ".woff2",
];

/// Extracts same-site page links from raw HTML
///
/// Scans `html` for href attribute values and resolves each against
/// `base_url` (the URL the HTML was fetched from). A link survives when:
///
/// - it resolves to a valid `http`/`https` URL,
/// - its path does not end in a known non-page extension,
/// - its host is the same site as `base_url` (see
///   [`same_site`](crate::url::same_site)).
///
/// Surviving links are normalized to their crawl key (query and fragment
/// stripped) and deduplicated within the page, first occurrence winning.
///
/// The result is returned in **reverse** discovery order: navigational and
/// footer links (About, Contact) usually sit late in the markup and are the
/// most likely to carry contact emails, so they should reach the frontier
/// first.
///
/// Malformed hrefs are silently skipped; this function never fails.
pub fn extract_internal_links(html: &str, base_url: &Url) -> Vec<Url> {
    let base_host = match extract_host(base_url) {
        Some(host) => host,
        None => return Vec::new(),
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut links = Vec::new();

    for caps in HREF_RE.captures_iter(html) {
        let href = caps[1].trim();
        if href.is_empty() {
            continue;
        }

        let resolved = match base_url.join(href) {
            Ok(url) => url,
            Err(_) => continue,
        };

        // Rejects mailto:, javascript:, tel:, data: and friends, and
        // strips query/fragment down to the crawl key.
        let normalized = match normalize_parsed(resolved) {
            Ok(url) => url,
            Err(_) => continue,
        };

        if has_skipped_extension(normalized.path()) {
            continue;
        }

        let host = match extract_host(&normalized) {
            Some(host) => host,
            None => continue,
        };
        if !same_site(&base_host, &host) {
            continue;
        }

        if seen.insert(normalized.as_str().to_string()) {
            links.push(normalized);
        }
    }

    links.reverse();
    links
}

/// Returns true if the path ends in a non-page file extension
fn has_skipped_extension(path: &str) -> bool {
    let lower = path.to_lowercase();
    SKIPPED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}
