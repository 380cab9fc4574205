use crate::config::Config;
use crate::discovery::ScanWarning;
use log::{debug, error, info, warn};
use std::path::Path;

/// Initialize the logger with appropriate level based on verbosity
pub fn init_logger(verbose: bool, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Off
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn // Skipped files stay visible
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    debug!("Logger initialized with level: {level:?}");
}

/// Log configuration information
pub fn log_config_info(config: &Config) {
    info!(
        "Configuration: concurrency={}, timeout={}s, skip_external={}, check_fragments={}",
        config.concurrency(),
        config.timeout_duration().as_secs(),
        config.skip_external(),
        config.check_fragments()
    );
    info!(
        "Retry: attempts={}, backoff_base={}ms",
        config.retry_attempts(),
        config.backoff_base_duration().as_millis()
    );
    info!(
        "Rate limiting: delay={}ms per host",
        config.rate_limit_delay_duration().as_millis()
    );
    if let Some(categories) = config.category_filter() {
        let labels: Vec<&str> = categories.iter().map(|c| c.as_str()).collect();
        info!("Category filter: {}", labels.join(", "));
    }
}

/// Log scan summary
pub fn log_scan_complete(root: &Path, files_scanned: usize, links: usize, warnings: usize) {
    info!(
        "Scanned {files_scanned} file(s) under {}: {links} link(s), {warnings} warning(s)",
        root.display()
    );
}

/// Log the per-file problems that were skipped during the scan
pub fn log_scan_warnings(warnings: &[ScanWarning]) {
    for warning in warnings {
        debug!("Skipped {}: {}", warning.path.display(), warning.message);
    }
}

/// Log validation progress
pub fn log_validation_start(link_count: usize) {
    info!("Starting validation of {link_count} link(s)");
}

/// Log validation completion
pub fn log_validation_complete(link_count: usize, issues: usize, duration_ms: u128) {
    if issues == 0 {
        info!("Validation complete: {link_count} link(s), no issues ({duration_ms}ms)");
    } else {
        warn!(
            "Validation complete: {link_count} link(s), {issues} issue(s) found ({duration_ms}ms)"
        );
    }
}

/// Log error information
pub fn log_error(message: &str, source: Option<&dyn std::error::Error>) {
    match source {
        Some(err) => error!("{message}: {err}"),
        None => error!("{message}"),
    }
}
