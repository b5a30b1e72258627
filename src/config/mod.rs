//! Configuration module for Wiki-Distill
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so an empty file (or no file at all) yields a
//! configuration for the Clocktower character wiki crawl.
//!
//! # Example
//!
//! ```no_run
//! use wiki_distill::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("distill.toml")).unwrap();
//! println!("Index page: {}", config.site.index_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CleanerConfig, Config, FetcherConfig, OutputConfig, SiteConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
