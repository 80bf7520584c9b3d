use once_cell::sync::Lazy;
use regex::Regex;

/// Matches the general `local@domain` shape with a ≥2-letter TLD label.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());

/// `@` followed by a numeric version (`@8`, `@8.2`, `@8.2.1`).
static VERSION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@\d+(?:\.\d+)*").unwrap());

/// Entirely digits and email punctuation, no letters anywhere.
static PUNCT_ONLY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9@.-]+$").unwrap());

/// Substrings that mark a match as an asset filename, not an address.
const ASSET_MARKERS: &[&str] = &[".js", ".css", ".min.", ".bundle", ".chunk", ".hash"];

/// Extracts candidate email addresses from raw HTML
///
/// Finds every substring shaped like an email address, then drops the
/// false positives that bundled-asset filenames and version strings
/// produce. The filters, applied in order:
///
/// 1. Reject matches containing an asset marker (`.js`, `.css`, `.min.`,
///    `.bundle`, `.chunk`, `.hash`).
/// 2. Reject matches where `@` is followed by a numeric version pattern.
/// 3. Reject matches made up solely of digits, `@`, `.`, `-`.
/// 4. Require at least one letter in both the local part and the domain.
/// 5. Require the domain to contain a `.` and not start or end with one.
///
/// The returned list may contain duplicates; the caller deduplicates
/// against the session's found-email set. Never fails; text without
/// addresses yields an empty list.
pub fn extract_emails(html: &str) -> Vec<String> {
    EMAIL_RE
        .find_iter(html)
        .map(|m| m.as_str().to_string())
        .filter(|candidate| is_plausible_address(candidate))
        .collect()
}

/// Applies the false-positive filters to a single regex match
fn is_plausible_address(candidate: &str) -> bool {
    let lower = candidate.to_lowercase();
    if ASSET_MARKERS.iter().any(|marker| lower.contains(marker)) {
        return false;
    }

    if VERSION_RE.is_match(candidate) {
        return false;
    }

    if PUNCT_ONLY_RE.is_match(candidate) {
        return false;
    }

    let (local, domain) = match candidate.split_once('@') {
        Some(parts) => parts,
        None => return false,
    };

    let has_letter = |s: &str| s.chars().any(|c| c.is_ascii_alphabetic());
    if !has_letter(local) || !has_letter(domain) {
        return false;
    }

    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
