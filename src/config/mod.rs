//! Configuration module for leadtrawl
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every session parameter has a default, so a config listing only
//! `targets` (or a `[leads]` section) is enough to run.
//!
//! # Example
//!
//! ```no_run
//! use leadtrawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Page budget: {}", config.session.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetcherConfig, LeadsConfig, OutputConfig, SessionConfig};

// Re-export parser functions
pub use parser::load_config;
