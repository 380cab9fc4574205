// Command-line interface definitions and parsing for doclinks

use crate::config::CliConfig;
use crate::core::constants::output_formats;
use crate::core::types::LinkCategory;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root of the document tree to scan
    #[arg(default_value = ".")]
    pub root: String,

    // Core Options
    /// Per-request timeout in seconds (default: 10)
    #[arg(
        short = 't',
        long,
        value_name = "SECONDS",
        help_heading = "Core Options"
    )]
    pub timeout: Option<u64>,

    /// Concurrent validations (default: CPU cores)
    #[arg(long, value_name = "COUNT", help_heading = "Core Options")]
    pub concurrency: Option<usize>,

    /// Report external links as skipped instead of checking them
    #[arg(long, help_heading = "Core Options")]
    pub skip_external: bool,

    /// Also check the #fragment of links to other documents
    #[arg(long, help_heading = "Core Options")]
    pub check_fragments: bool,

    // Filtering
    /// Only validate external and Colab links
    #[arg(long, conflicts_with = "only", help_heading = "Filtering")]
    pub external_only: bool,

    /// Only validate these categories (comma-separated)
    #[arg(
        long,
        value_name = "CATEGORIES",
        value_delimiter = ',',
        help_heading = "Filtering"
    )]
    pub only: Vec<LinkCategory>,

    /// Link targets to skip (regex)
    #[arg(long, value_name = "REGEX", help_heading = "Filtering")]
    pub exclude_pattern: Vec<String>,

    /// Extra directory names to skip while scanning
    #[arg(long, value_name = "NAME", help_heading = "Filtering")]
    pub ignore_dir: Vec<String>,

    // Retry & Rate Limiting
    /// Attempts per external link (default: 3)
    #[arg(long, value_name = "COUNT", help_heading = "Retry & Rate Limiting")]
    pub retry: Option<u8>,

    /// Minimum delay between requests to the same host in ms (default: 500)
    #[arg(long, value_name = "MS", help_heading = "Retry & Rate Limiting")]
    pub rate_limit: Option<u64>,

    // Output & Verbosity
    /// Suppress progress and log output
    #[arg(short = 'q', long, help_heading = "Output & Verbosity")]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long, help_heading = "Output & Verbosity")]
    pub verbose: bool,

    /// Output format (`all` prints text and writes <OUTPUT>.json and <OUTPUT>.md)
    #[arg(long, value_name = "FORMAT", value_parser = output_formats::ALL, help_heading = "Output & Verbosity")]
    pub format: Option<String>,

    /// Write the report to a file instead of stdout (base name for `all`)
    #[arg(short = 'o', long, value_name = "PATH", help_heading = "Output & Verbosity")]
    pub output: Option<String>,

    /// Disable progress bars
    #[arg(long, help_heading = "Output & Verbosity")]
    pub no_progress: bool,

    // Network
    /// Custom User-Agent header
    #[arg(long, value_name = "AGENT", help_heading = "Network")]
    pub user_agent: Option<String>,

    // Configuration
    /// Use specific config file
    #[arg(long, value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Ignore config files
    #[arg(long, help_heading = "Configuration")]
    pub no_config: bool,
}

/// Convert the parsed CLI into the options that override file configuration
pub fn cli_to_config(cli: &Cli) -> CliConfig {
    CliConfig {
        // Core options
        timeout: cli.timeout,
        skip_external: cli.skip_external,
        check_fragments: cli.check_fragments,

        // Filtering
        external_only: cli.external_only,
        only_categories: non_empty(&cli.only),
        exclude_patterns: non_empty(&cli.exclude_pattern),
        ignore_dirs: non_empty(&cli.ignore_dir),

        // Performance & behavior
        concurrency: cli.concurrency,
        retry_attempts: cli.retry,
        rate_limit_delay: cli.rate_limit,

        // Output & format
        quiet: cli.quiet,
        verbose: cli.verbose,
        output_format: cli.format.clone(),
        no_progress: cli.no_progress,

        // Network
        user_agent: cli.user_agent.clone(),

        // Configuration
        config_file: cli.config.clone(),
        no_config: cli.no_config,
    }
}

fn non_empty<T: Clone>(values: &[T]) -> Option<Vec<T>> {
    if values.is_empty() {
        None
    } else {
        Some(values.to_vec())
    }
}
