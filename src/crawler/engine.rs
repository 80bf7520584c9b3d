//! Crawl engine - per-session orchestration
//!
//! The engine drains the frontier in chunks. Within a chunk it dispatches
//! batches of at most `concurrency` URLs, fetches each batch concurrently
//! under a per-fetch timeout, and feeds every result through extraction
//! back into the shared crawl state. Budgets are re-checked after every
//! batch and chunk; per-page failures are logged and isolated.

use crate::config::SessionConfig;
use crate::crawler::Fetcher;
use crate::extract::{extract_emails, extract_internal_links};
use crate::sink::{Sink, SinkStream};
use crate::state::CrawlState;
use crate::url::normalize_parsed;
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use url::Url;

/// Why a session stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// No more same-site URLs to visit
    FrontierExhausted,
    /// The page budget was spent
    PageBudget,
    /// Enough emails were found
    EmailBudget,
    /// The worker-dispatch mechanism itself failed; results are partial
    Aborted(String),
}

/// Final report for one crawl session
///
/// A session always produces a report; an empty email list does not mean
/// the site has no addresses, only that none were found before a budget
/// or the frontier ran out.
#[derive(Debug, Clone)]
pub struct SessionReport {
    /// The URL the session started from
    pub start_url: Url,
    /// Distinct emails in first-seen order
    pub emails: Vec<String>,
    /// Pages dispatched for fetching
    pub pages_dispatched: usize,
    /// Why the session stopped
    pub outcome: SessionOutcome,
    /// Wall-clock session duration
    pub elapsed: Duration,
}

/// Crawl engine for a single website session
pub struct Engine {
    config: SessionConfig,
    fetcher: Arc<dyn Fetcher>,
    sink: Arc<dyn Sink>,
}

impl Engine {
    /// Creates an engine with injected fetch and sink capabilities
    pub fn new(config: SessionConfig, fetcher: Arc<dyn Fetcher>, sink: Arc<dyn Sink>) -> Self {
        Self {
            config,
            fetcher,
            sink,
        }
    }

    /// Runs one session to completion and reports the found emails
    ///
    /// The loop structure:
    ///
    /// 1. Re-check the termination conditions (email budget, page budget,
    ///    empty frontier).
    /// 2. Run one chunk: batches of up to `concurrency` URLs, each batch
    ///    fetched concurrently, budgets re-checked after every batch.
    /// 3. Repeat until a condition holds or the dispatch mechanism fails.
    ///
    /// Per-page failures never end the session. The only abort path is a
    /// worker that cannot be joined, and even then the report carries
    /// everything accumulated up to that point.
    pub async fn run(&self, start_url: &Url) -> SessionReport {
        let started = Instant::now();
        let state = Arc::new(CrawlState::new());

        match normalize_parsed(start_url.clone()) {
            Ok(seed) => {
                state.enqueue_if_new(seed);
            }
            Err(error) => {
                tracing::error!("Cannot seed session from {}: {}", start_url, error);
            }
        }

        tracing::info!("Starting session for {}", start_url);

        let outcome = loop {
            if state.found_count() >= self.config.max_emails {
                break SessionOutcome::EmailBudget;
            }
            if state.pages_dispatched() >= self.config.max_pages {
                break SessionOutcome::PageBudget;
            }
            if state.frontier_len() == 0 {
                break SessionOutcome::FrontierExhausted;
            }

            if let Err(reason) = self.run_chunk(&state).await {
                tracing::error!("Session aborted for {}: {}", start_url, reason);
                self.log(&format!("Session aborted for {}: {}", start_url, reason));
                break SessionOutcome::Aborted(reason);
            }
        };

        let report = SessionReport {
            start_url: start_url.clone(),
            emails: state.found_emails(),
            pages_dispatched: state.pages_dispatched(),
            outcome,
            elapsed: started.elapsed(),
        };

        tracing::info!(
            "Session finished for {}: {} pages, {} emails, {:?} in {:?}",
            start_url,
            report.pages_dispatched,
            report.emails.len(),
            report.outcome,
            report.elapsed
        );

        report
    }

    /// Dispatches and drains one chunk of batches
    ///
    /// Returns `Err` with a reason only when the dispatch mechanism
    /// itself fails; that error aborts the session.
    async fn run_chunk(&self, state: &Arc<CrawlState>) -> Result<(), String> {
        let mut pages_in_chunk = 0;

        while pages_in_chunk < self.config.chunk_size {
            let budget_left = self
                .config
                .max_pages
                .saturating_sub(state.pages_dispatched());
            let chunk_left = self.config.chunk_size - pages_in_chunk;
            let batch_size = self.config.concurrency.min(chunk_left).min(budget_left);

            let batch = state.dispatch_batch(batch_size);
            if batch.is_empty() {
                break;
            }
            pages_in_chunk += batch.len();

            let mut workers = JoinSet::new();
            for url in batch {
                workers.spawn(process_page(
                    url,
                    Arc::clone(state),
                    Arc::clone(&self.fetcher),
                    Arc::clone(&self.sink),
                    self.config.fetch_timeout(),
                ));
            }

            while let Some(joined) = workers.join_next().await {
                match joined {
                    Ok(page) => {
                        tracing::debug!(
                            "Processed {}: fetched={} new_links={} new_emails={}",
                            page.url,
                            page.fetched,
                            page.new_links,
                            page.new_emails
                        );
                    }
                    Err(error) => {
                        // Losing a worker means the dispatch mechanism is
                        // broken, not the page; stop the whole session.
                        workers.abort_all();
                        return Err(format!("worker dispatch failed: {}", error));
                    }
                }
            }

            // The email budget is re-checked per batch, so a session stops
            // at the end of the batch in which the budget was met.
            if state.found_count() >= self.config.max_emails {
                break;
            }
        }

        tracing::info!(
            "Chunk complete: {} pages this chunk, {} queued, {} emails so far",
            pages_in_chunk,
            state.frontier_len(),
            state.found_count()
        );

        Ok(())
    }

    fn log(&self, text: &str) {
        log_line(&*self.sink, text);
    }
}

/// Outcome of processing one dispatched URL
struct PageOutcome {
    url: Url,
    fetched: bool,
    new_links: usize,
    new_emails: usize,
}

/// Fetches one URL and feeds the result back into the crawl state
///
/// Every failure mode (timeout, fetch error) ends here: the error becomes
/// a log entry and the rest of the batch is unaffected. There is no
/// per-page retry.
async fn process_page(
    url: Url,
    state: Arc<CrawlState>,
    fetcher: Arc<dyn Fetcher>,
    sink: Arc<dyn Sink>,
    fetch_timeout: Duration,
) -> PageOutcome {
    let failed = |url: Url| PageOutcome {
        url,
        fetched: false,
        new_links: 0,
        new_emails: 0,
    };

    let html = match tokio::time::timeout(fetch_timeout, fetcher.fetch(&url)).await {
        Ok(Ok(html)) => html,
        Ok(Err(error)) => {
            tracing::warn!("Failed to fetch {}: {}", url, error);
            log_line(&*sink, &format!("Error processing {}: {}", url, error));
            return failed(url);
        }
        Err(_) => {
            tracing::warn!("Fetch timed out for {}", url);
            log_line(&*sink, &format!("Error processing {}: fetch timed out", url));
            return failed(url);
        }
    };

    log_line(&*sink, &format!("Crawled: {}", url));

    let candidates = extract_emails(&html);
    let new_emails = state.record_emails(&candidates);
    for email in &new_emails {
        tracing::info!("Found email: {} on {}", email, url);
        log_line(&*sink, &format!("Found email: {} on {}", email, url));
    }

    let mut new_links = 0;
    for link in extract_internal_links(&html, &url) {
        if state.enqueue_if_new(link) {
            new_links += 1;
        }
    }

    PageOutcome {
        url,
        fetched: true,
        new_links,
        new_emails: new_emails.len(),
    }
}

/// Appends a timestamped line to the sink's log stream
///
/// Sink failures are reduced to a tracing warning; observability problems
/// must not stop a crawl.
fn log_line(sink: &dyn Sink, text: &str) {
    let line = format!("[{}] {}", Utc::now().format("%Y-%m-%dT%H:%M:%SZ"), text);
    if let Err(error) = sink.append_line(SinkStream::Log, &line) {
        tracing::warn!("Log sink write failed: {}", error);
    }
}

/// Runs one crawl session for `start_url`
///
/// Convenience wrapper over [`Engine`]; see [`Engine::run`].
pub async fn run_session(
    start_url: &Url,
    config: &SessionConfig,
    fetcher: Arc<dyn Fetcher>,
    sink: Arc<dyn Sink>,
) -> SessionReport {
    Engine::new(config.clone(), fetcher, sink).run(start_url).await
}
