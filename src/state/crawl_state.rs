use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use url::Url;

/// Shared mutable state for one crawl session
///
/// Holds the frontier (FIFO queue of discovered-but-unvisited URLs), the
/// visited set, and the found-email set. All mutation goes through the
/// operations below, each of which takes the single internal lock, so the
/// three structures can never be observed mid-update:
///
/// - a URL is marked visited in the same critical section that removes it
///   from the frontier, so it cannot be re-enqueued while in flight;
/// - enqueue checks visited and pending membership under the same lock
///   that inserts, so two workers discovering the same link enqueue it at
///   most once;
/// - email dedup is checked against the live set, never a snapshot.
///
/// URLs are compared by their normalized string form (the crawl key);
/// callers normalize before enqueueing.
pub struct CrawlState {
    inner: Mutex<Inner>,
}

struct Inner {
    frontier: VecDeque<Url>,
    /// Crawl keys currently sitting in the frontier.
    pending: HashSet<String>,
    /// Crawl keys ever handed out by `dispatch_batch`.
    visited: HashSet<String>,
    /// Found emails in first-seen order.
    emails: Vec<String>,
    email_keys: HashSet<String>,
    pages_dispatched: usize,
}

impl CrawlState {
    /// Creates empty state for a new session
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                frontier: VecDeque::new(),
                pending: HashSet::new(),
                visited: HashSet::new(),
                emails: Vec::new(),
                email_keys: HashSet::new(),
                pages_dispatched: 0,
            }),
        }
    }

    /// Adds a URL to the frontier unless it was already seen
    ///
    /// A URL already in the visited set or already waiting in the frontier
    /// is ignored. Returns whether the URL was actually enqueued.
    pub fn enqueue_if_new(&self, url: Url) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let key = url.as_str().to_string();

        if inner.visited.contains(&key) || inner.pending.contains(&key) {
            return false;
        }

        inner.pending.insert(key);
        inner.frontier.push_back(url);
        true
    }

    /// Removes up to `n` URLs from the front of the frontier
    ///
    /// Each returned URL is marked visited before this call returns, so no
    /// URL can be dispatched twice and no in-flight URL remains pending in
    /// the frontier. Also advances the session's dispatch counter.
    pub fn dispatch_batch(&self, n: usize) -> Vec<Url> {
        let mut inner = self.inner.lock().unwrap();
        let mut batch = Vec::with_capacity(n.min(inner.frontier.len()));

        while batch.len() < n {
            let url = match inner.frontier.pop_front() {
                Some(url) => url,
                None => break,
            };
            let key = url.as_str().to_string();
            inner.pending.remove(&key);
            inner.visited.insert(key);
            batch.push(url);
        }

        inner.pages_dispatched += batch.len();
        batch
    }

    /// Records candidate emails, returning only the ones not seen before
    ///
    /// Dedup happens against the live found-email set inside one critical
    /// section, so the same address submitted by two workers (or twice in
    /// one candidate list) is recorded exactly once. Submission order is
    /// preserved for the newly-added subset.
    pub fn record_emails(&self, candidates: &[String]) -> Vec<String> {
        let mut inner = self.inner.lock().unwrap();
        let mut fresh = Vec::new();

        for candidate in candidates {
            if inner.email_keys.insert(candidate.clone()) {
                inner.emails.push(candidate.clone());
                fresh.push(candidate.clone());
            }
        }

        fresh
    }

    /// Number of URLs waiting in the frontier
    pub fn frontier_len(&self) -> usize {
        self.inner.lock().unwrap().frontier.len()
    }

    /// Number of URLs ever dispatched for fetching this session
    pub fn pages_dispatched(&self) -> usize {
        self.inner.lock().unwrap().pages_dispatched
    }

    /// Number of distinct emails found so far
    pub fn found_count(&self) -> usize {
        self.inner.lock().unwrap().emails.len()
    }

    /// Snapshot of the found emails in first-seen order
    pub fn found_emails(&self) -> Vec<String> {
        self.inner.lock().unwrap().emails.clone()
    }

    /// True if `url` has been dispatched at some point this session
    pub fn is_visited(&self, url: &Url) -> bool {
        self.inner.lock().unwrap().visited.contains(url.as_str())
    }
}

impl Default for CrawlState {
    fn default() -> Self {
        Self::new()
    }
}
