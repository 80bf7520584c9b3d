//! URL handling module for leadtrawl
//!
//! This module provides crawl-key normalization, host extraction, scheme
//! defaulting for upstream-supplied URLs, and the same-site host
//! equivalence used to keep the crawl inside one website.

mod domain;
mod matcher;
mod normalize;

// Re-export main functions
pub use domain::extract_host;
pub use matcher::same_site;
pub use normalize::{ensure_scheme, normalize_parsed, normalize_url};
