//! Extraction module for leadtrawl
//!
//! Pure functions that scan raw HTML text for internal links and candidate
//! email addresses. Both scanners are regex-based on purpose: the
//! suppression heuristics (asset-extension list, reverse-order link
//! prioritization, email false-positive filters) operate on raw attribute
//! text and would not survive a round-trip through a full HTML parser.
//!
//! Neither function performs I/O, holds state, or returns an error;
//! malformed input simply yields fewer results.

mod emails;
mod links;

pub use emails::extract_emails;
pub use links::extract_internal_links;
