//! Configuration management
//!
//! This module handles loading and managing configuration from
//! TOML files and CLI arguments.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::core::constants::{defaults, output_formats, timeouts};
use crate::core::error::{DocLinksError, Result};
use crate::core::types::LinkCategory;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Per-request timeout in seconds for external probes
    pub timeout: Option<u64>,

    /// Report external links as skipped instead of probing them
    pub skip_external: Option<bool>,

    /// Only validate links of these categories
    pub only_categories: Option<Vec<LinkCategory>>,

    /// Attempts per external link, including the first
    pub retry_attempts: Option<u8>,

    /// Minimum delay between requests to the same host in milliseconds
    pub rate_limit_delay: Option<u64>,

    /// Base of the exponential backoff in milliseconds
    pub backoff_base: Option<u64>,

    /// Number of links validated concurrently
    pub concurrency: Option<usize>,

    /// Custom User-Agent header
    pub user_agent: Option<String>,

    /// Target patterns to skip (regex)
    pub exclude_patterns: Option<Vec<String>>,

    /// Extra directory names to skip while walking the tree
    pub ignore_dirs: Option<Vec<String>>,

    /// Also check the `#fragment` of internal links against the target document
    pub check_fragments: Option<bool>,

    /// Output format (text, json, markdown)
    pub output_format: Option<String>,

    /// Enable verbose logging
    pub verbose: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: Some(timeouts::DEFAULT_TIMEOUT_SECONDS),
            skip_external: Some(false),
            only_categories: None, // Validate every category
            retry_attempts: Some(defaults::RETRY_ATTEMPTS),
            rate_limit_delay: Some(timeouts::DEFAULT_RATE_LIMIT_MS),
            backoff_base: Some(timeouts::DEFAULT_BACKOFF_BASE_MS),
            concurrency: None, // Will default to CPU core count
            user_agent: None,
            exclude_patterns: None,
            ignore_dirs: None,
            check_fragments: Some(false),
            output_format: Some(output_formats::DEFAULT.to_string()),
            verbose: Some(false),
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            DocLinksError::Config(format!(
                "Could not read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            DocLinksError::Config(format!(
                "Invalid TOML in config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Try to find and load a config file in standard locations
    pub fn load_from_standard_locations() -> Self {
        if let Ok(config) = Self::load_from_file(defaults::CONFIG_FILE_NAME) {
            return config;
        }

        // Parent directories (up to 3 levels)
        for i in 1..=3 {
            let path = format!("{}{}", "../".repeat(i), defaults::CONFIG_FILE_NAME);
            if let Ok(config) = Self::load_from_file(&path) {
                return config;
            }
        }

        Self::default()
    }

    /// Merge this config with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli_config: &CliConfig) {
        // Core options
        if let Some(timeout) = cli_config.timeout {
            self.timeout = Some(timeout);
        }
        if cli_config.skip_external {
            self.skip_external = Some(true);
        }
        if cli_config.check_fragments {
            self.check_fragments = Some(true);
        }

        // Filtering
        if cli_config.external_only {
            self.only_categories = Some(vec![LinkCategory::External, LinkCategory::Colab]);
        } else if let Some(ref categories) = cli_config.only_categories {
            self.only_categories = Some(categories.clone());
        }
        if let Some(ref exclude_patterns) = cli_config.exclude_patterns {
            self.exclude_patterns = Some(exclude_patterns.clone());
        }
        if let Some(ref ignore_dirs) = cli_config.ignore_dirs {
            self.ignore_dirs = Some(ignore_dirs.clone());
        }

        // Performance & behavior
        if let Some(concurrency) = cli_config.concurrency {
            self.concurrency = Some(concurrency);
        }
        if let Some(retry_attempts) = cli_config.retry_attempts {
            self.retry_attempts = Some(retry_attempts);
        }
        if let Some(rate_limit_delay) = cli_config.rate_limit_delay {
            self.rate_limit_delay = Some(rate_limit_delay);
        }

        // Output & format
        if cli_config.verbose {
            self.verbose = Some(true);
        }
        if let Some(ref output_format) = cli_config.output_format {
            self.output_format = Some(output_format.clone());
        }

        // Network
        if let Some(ref user_agent) = cli_config.user_agent {
            self.user_agent = Some(user_agent.clone());
        }
    }

    /// Compile exclude patterns into regex objects
    pub fn compile_exclude_patterns(&self) -> Result<Vec<Regex>> {
        let mut compiled = Vec::new();
        if let Some(ref patterns) = self.exclude_patterns {
            for pattern in patterns {
                compiled.push(Regex::new(pattern)?);
            }
        }
        Ok(compiled)
    }

    /// Categories to keep after discovery, if filtering is enabled
    pub fn category_filter(&self) -> Option<&[LinkCategory]> {
        self.only_categories.as_deref()
    }

    /// Get timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(timeouts::DEFAULT_TIMEOUT_SECONDS))
    }

    /// Get per-host rate limit delay as Duration
    pub fn rate_limit_delay_duration(&self) -> Duration {
        Duration::from_millis(
            self.rate_limit_delay
                .unwrap_or(timeouts::DEFAULT_RATE_LIMIT_MS),
        )
    }

    /// Get backoff base as Duration
    pub fn backoff_base_duration(&self) -> Duration {
        Duration::from_millis(self.backoff_base.unwrap_or(timeouts::DEFAULT_BACKOFF_BASE_MS))
    }

    pub fn retry_attempts(&self) -> u8 {
        self.retry_attempts.unwrap_or(defaults::RETRY_ATTEMPTS).max(1)
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency.unwrap_or_else(num_cpus::get).max(1)
    }

    pub fn skip_external(&self) -> bool {
        self.skip_external.unwrap_or(false)
    }

    pub fn check_fragments(&self) -> bool {
        self.check_fragments.unwrap_or(false)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err(DocLinksError::Config(
                    "Timeout cannot be 0. Expected a positive integer representing seconds."
                        .to_string(),
                ));
            }
            if timeout > timeouts::MAX_TIMEOUT_SECONDS {
                return Err(DocLinksError::Config(format!(
                    "Timeout of {timeout} seconds is extremely large (>24 hours). Consider using a smaller value."
                )));
            }
        }

        if let Some(concurrency) = self.concurrency {
            if concurrency == 0 {
                return Err(DocLinksError::Config(
                    "Concurrency cannot be 0. Expected a positive integer.".to_string(),
                ));
            }
            if concurrency > defaults::MAX_CONCURRENCY {
                return Err(DocLinksError::Config(format!(
                    "Concurrency of {concurrency} is extremely high and may cause system instability. Consider using a smaller value."
                )));
            }
        }

        if let Some(retry) = self.retry_attempts {
            if retry == 0 {
                return Err(DocLinksError::Config(
                    "Retry attempts cannot be 0. At least one attempt is required.".to_string(),
                ));
            }
            if retry > defaults::MAX_RETRY_ATTEMPTS {
                return Err(DocLinksError::Config(format!(
                    "Retry attempts of {retry} is very high and may cause long delays. Consider using a smaller value."
                )));
            }
        }

        if let Some(ref format) = self.output_format
            && !output_formats::ALL.contains(&format.as_str())
        {
            return Err(DocLinksError::Config(format!(
                "Invalid output format '{format}'. Expected one of: {}.",
                output_formats::ALL.join(", ")
            )));
        }

        // Validate exclude patterns by trying to compile them
        self.compile_exclude_patterns()?;

        Ok(())
    }
}

/// Configuration options that can come from CLI
#[derive(Debug, Default)]
pub struct CliConfig {
    // Core options
    pub timeout: Option<u64>,  // --timeout
    pub skip_external: bool,   // --skip-external
    pub check_fragments: bool, // --check-fragments

    // Filtering
    pub external_only: bool,                        // --external-only
    pub only_categories: Option<Vec<LinkCategory>>, // --only
    pub exclude_patterns: Option<Vec<String>>,      // --exclude-pattern
    pub ignore_dirs: Option<Vec<String>>,           // --ignore-dir

    // Performance & behavior
    pub concurrency: Option<usize>,      // --concurrency
    pub retry_attempts: Option<u8>,      // --retry
    pub rate_limit_delay: Option<u64>,   // --rate-limit

    // Output & format
    pub quiet: bool,                   // --quiet
    pub verbose: bool,                 // --verbose
    pub output_format: Option<String>, // --format
    pub no_progress: bool,             // --no-progress

    // Network
    pub user_agent: Option<String>, // --user-agent

    // Configuration
    pub config_file: Option<String>, // --config
    pub no_config: bool,             // --no-config
}
