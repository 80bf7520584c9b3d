use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for leadtrawl
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Explicit target websites; overrides the lead source when non-empty
    #[serde(default)]
    pub targets: Vec<String>,
    /// Upstream lead-source credentials; optional
    pub leads: Option<LeadsConfig>,
}

/// Crawl-session budgets and concurrency settings
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Maximum number of concurrent fetches per batch
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Pages dispatched between budget re-checks
    #[serde(rename = "chunk-size", default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Hard cap on pages dispatched per session
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Stop early once this many distinct emails are found
    #[serde(rename = "max-emails", default = "default_max_emails")]
    pub max_emails: usize,

    /// Per-fetch deadline in seconds
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl SessionConfig {
    /// The per-fetch deadline as a `Duration`
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            chunk_size: default_chunk_size(),
            max_pages: default_max_pages(),
            max_emails: default_max_emails(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

/// Browser identity presented by the HTTP fetcher
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// User-agent header value
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Accept-Language header value
    #[serde(rename = "accept-language", default = "default_accept_language")]
    pub accept_language: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
        }
    }
}

/// Sink file locations
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the crawl-event log file
    #[serde(rename = "log-path", default = "default_log_path")]
    pub log_path: String,

    /// Path of the email results file
    #[serde(rename = "results-path", default = "default_results_path")]
    pub results_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log_path: default_log_path(),
            results_path: default_results_path(),
        }
    }
}

/// Upstream lead-source pipeline settings
#[derive(Debug, Clone, Deserialize)]
pub struct LeadsConfig {
    /// API base, e.g. "https://api.example-pipeline.com/api/v1"
    #[serde(rename = "api-base")]
    pub api_base: String,

    /// Bearer token for the pipeline API
    #[serde(rename = "auth-token")]
    pub auth_token: String,

    /// Account identifier passed on every call
    #[serde(rename = "user-id")]
    pub user_id: String,

    /// Identifier of the saved pipeline to start
    #[serde(rename = "saved-item-id")]
    pub saved_item_id: String,

    /// How many companies to request per run
    #[serde(rename = "company-count", default = "default_company_count")]
    pub company_count: u32,

    /// Industry/sector filter sent with the run request
    #[serde(default = "default_sector")]
    pub sector: String,

    /// Key under the run's `outputs` object holding the URL list
    #[serde(rename = "output-key", default = "default_output_key")]
    pub output_key: String,

    /// Delay between run-status polls in seconds
    #[serde(rename = "poll-interval-secs", default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl LeadsConfig {
    /// The poll delay as a `Duration`
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

fn default_concurrency() -> usize {
    4
}

fn default_chunk_size() -> usize {
    1000
}

fn default_max_pages() -> usize {
    10_000
}

fn default_max_emails() -> usize {
    5
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    // A mainstream desktop browser identity; sites that serve contact
    // pages to humans should serve them to us.
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
        .to_string()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9".to_string()
}

fn default_log_path() -> String {
    "log.txt".to_string()
}

fn default_results_path() -> String {
    "emails.txt".to_string()
}

fn default_company_count() -> u32 {
    3
}

fn default_sector() -> String {
    "Technology".to_string()
}

fn default_output_key() -> String {
    "urls".to_string()
}

fn default_poll_interval_secs() -> u64 {
    2
}
