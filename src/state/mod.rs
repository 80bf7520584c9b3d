//! State module for a single crawl session
//!
//! One [`CrawlState`] exists per session and is the only data shared
//! between concurrent workers: the frontier queue, the visited set, and
//! the found-email set, all guarded by a single mutex so that dequeue,
//! visited-marking, and email dedup are inseparable operations.

mod crawl_state;

pub use crawl_state::CrawlState;
