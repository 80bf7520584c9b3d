//! Lead-source module
//!
//! Wraps the upstream lead-sourcing pipeline API: start a sourcing run,
//! poll it until it completes, and hand back the list of candidate
//! website URLs. The crawl core never depends on this module; the binary
//! uses it when no explicit targets are configured.

mod client;

pub use client::{LeadClient, LeadsError};
