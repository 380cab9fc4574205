//! # doclinks
//!
//! Find and validate the links in a tree of Markdown, Jupyter notebook, HTML
//! and LaTeX documents.
//!
//! Links are extracted per format, classified into a small set of
//! categories and checked with the routine for that category: HTTP probes
//! with retry and per-host rate limiting for external URLs, filesystem
//! checks for relative paths, and heading-slug lookups for anchors. Every
//! outcome is cached for the rest of the run.
//!
//! ```no_run
//! use doclinks::config::Config;
//! use doclinks::discovery::{Finder, LinkFinder};
//! use doclinks::validation::{ValidateLinks, Validator};
//! use std::path::Path;
//!
//! # async fn example() -> doclinks::Result<()> {
//! let config = Config::default();
//! let root = Path::new("docs");
//!
//! let discovery = Finder::default().discover(root)?;
//! let validator = Validator::new(root, &config)?;
//! let results = validator.validate_links(&discovery.links, None).await;
//!
//! std::process::exit(doclinks::reporting::exit_code(&results));
//! # }
//! ```

pub mod config;
pub mod core;
pub mod discovery;
pub mod reporting;
pub mod ui;
pub mod validation;

// Re-export commonly used types for convenience
pub use config::{CliConfig, Config};
pub use core::{
    DocLinksError, Link, LinkCategory, Locator, Outcome, RawLink, Result, ResultRecord,
    ValidationResult, ValidationStatus,
};
pub use discovery::{Discovery, Finder, LinkFinder, ScanWarning};
pub use reporting::{Summary, exit_code};
pub use validation::{ValidateLinks, Validator};
