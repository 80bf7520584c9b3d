/// Checks whether two hosts belong to the same website
///
/// The crawl must stay inside the site it started on, but real sites serve
/// the same pages from `example.com`, `www.example.com`, and assorted
/// subdomains. Two hosts are considered the same site when any of these
/// hold:
///
/// 1. Exact match
/// 2. One host is the other with a `www.` prefix added
/// 3. The last two host labels match (so `blog.example.com` and
///    `shop.example.com` both count as `example.com`)
///
/// The last-two-labels rule is an empirically tuned heuristic. It
/// misfires on multi-part public suffixes (`a.co.uk` vs `b.co.uk` share
/// `co.uk`), which is an accepted trade-off for not shipping a public
/// suffix list.
///
/// # Arguments
///
/// * `base_host` - The host of the session's start URL (lowercase)
/// * `candidate_host` - The host of a discovered link (lowercase)
///
/// # Examples
///
/// ```
/// use leadtrawl::url::same_site;
///
/// assert!(same_site("example.com", "example.com"));
/// assert!(same_site("example.com", "www.example.com"));
/// assert!(same_site("www.example.com", "example.com"));
/// assert!(same_site("blog.example.com", "shop.example.com"));
/// assert!(!same_site("example.com", "other.com"));
/// ```
pub fn same_site(base_host: &str, candidate_host: &str) -> bool {
    if candidate_host == base_host {
        return true;
    }

    // `www.` prefix added to either side
    if candidate_host.strip_prefix("www.") == Some(base_host) {
        return true;
    }
    if base_host.strip_prefix("www.") == Some(candidate_host) {
        return true;
    }

    last_two_labels(candidate_host) == last_two_labels(base_host)
}

/// Returns the last two dot-separated labels of a host
///
/// Hosts with two labels or fewer are returned unchanged.
fn last_two_labels(host: &str) -> &str {
    match host.rmatch_indices('.').nth(1) {
        Some((idx, _)) => &host[idx + 1..],
        None => host,
    }
}
