use clap::Parser;
use doclinks::ValidationStatus;
use doclinks::config::{CliConfig, Config};
use doclinks::core::constants::output_formats;
use doclinks::discovery::{Finder, LinkFinder, filter_categories};
use doclinks::reporting::{Summary, exit_code, logging};
use doclinks::ui::output::{self, DisplayMetadata};
use doclinks::ui::{Cli, ProgressReporter, cli_to_config};
use doclinks::validation::{ValidateLinks, Validator};

use std::path::Path;
use std::time::Instant;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match run_doclinks(&cli).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Scan, validate and report. Returns the process exit code.
pub async fn run_doclinks(cli: &Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let cli_config = cli_to_config(cli);
    let config = load_and_merge_config(&cli_config)?;

    let output_settings = setup_output_settings(&cli_config, &config);
    logging::init_logger(output_settings.verbose, output_settings.quiet);
    logging::log_config_info(&config);

    let root = Path::new(&cli.root);
    let mut progress = create_progress_reporter(&output_settings);

    // Discovery
    if let Some(ref mut progress) = progress {
        progress.start_scan(&cli.root);
    }
    let finder = Finder::new(config.ignore_dirs.clone().unwrap_or_default());
    let discovery = finder.discover(root).inspect_err(|e| {
        logging::log_error("Could not scan document tree", Some(e as &dyn std::error::Error));
    })?;
    if let Some(ref progress) = progress {
        progress.finish_scan(discovery.files_scanned, discovery.links.len());
    }
    logging::log_scan_complete(
        root,
        discovery.files_scanned,
        discovery.links.len(),
        discovery.warnings.len(),
    );
    logging::log_scan_warnings(&discovery.warnings);

    let links = filter_categories(discovery.links, config.category_filter());

    // Validation
    let validator = Validator::new(root, &config)?;
    if let Some(ref mut progress) = progress {
        progress.start_link_validation(links.len());
    }
    logging::log_validation_start(links.len());

    let start_time = Instant::now();
    let results = validator.validate_links(&links, progress.as_ref()).await;
    let summary = Summary::from_results(&results);
    logging::log_validation_complete(
        results.len(),
        summary.issue_count(),
        start_time.elapsed().as_millis(),
    );
    let timeouts = summary.count(ValidationStatus::Timeout);
    if timeouts > 0 {
        log::warn!("{timeouts} link(s) timed out; timeouts do not fail the run");
    }

    if let Some(ref progress) = progress {
        progress.finish_link_validation(summary.issue_count(), results.len());
        progress.finish_and_clear();
    }

    // Reporting
    let metadata = DisplayMetadata::new(discovery.files_scanned, discovery.warnings);
    output::emit_reports(
        &output_settings.output_format,
        &results,
        &metadata,
        cli.output.as_deref().map(Path::new),
    )?;

    Ok(exit_code(&results))
}

/// Load configuration from file or standard locations and merge with CLI config
pub fn load_and_merge_config(cli_config: &CliConfig) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if cli_config.no_config {
        Config::default()
    } else if let Some(ref config_file) = cli_config.config_file {
        Config::load_from_file(config_file)?
    } else {
        Config::load_from_standard_locations()
    };

    // Merge CLI arguments with configuration (CLI takes precedence)
    config.merge_with_cli(cli_config);
    config.validate()?;
    Ok(config)
}

/// Settings for output formatting and display
pub struct OutputSettings {
    pub quiet: bool,
    pub verbose: bool,
    pub output_format: String,
    pub show_progress: bool,
}

/// Setup output settings based on CLI and config
pub fn setup_output_settings(cli_config: &CliConfig, config: &Config) -> OutputSettings {
    let quiet = cli_config.quiet;
    let verbose = config.verbose.unwrap_or(false);
    let output_format = config
        .output_format
        .as_deref()
        .unwrap_or(output_formats::DEFAULT)
        .to_string();
    let show_progress = !quiet && !cli_config.no_progress;

    OutputSettings {
        quiet,
        verbose,
        output_format,
        show_progress,
    }
}

/// Progress bars only accompany the console text report
pub fn create_progress_reporter(output_settings: &OutputSettings) -> Option<ProgressReporter> {
    let console = output_settings.output_format == output_formats::TEXT
        || output_settings.output_format == output_formats::EVERY;
    if output_settings.show_progress && console {
        Some(ProgressReporter::new(true))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_and_merge_config_no_config_flag() {
        let cli_config = CliConfig {
            no_config: true,
            ..Default::default()
        };
        let config = load_and_merge_config(&cli_config).expect("default config is valid");

        assert_eq!(config.timeout, Some(10));
        assert_eq!(config.retry_attempts, Some(3));
    }

    #[test]
    fn test_load_and_merge_config_explicit_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"timeout = 20\nskip_external = true")?;

        let cli_config = CliConfig {
            config_file: Some(file.path().display().to_string()),
            timeout: Some(5),
            ..Default::default()
        };
        let config = load_and_merge_config(&cli_config)?;

        // CLI wins over the file, file wins over defaults
        assert_eq!(config.timeout, Some(5));
        assert!(config.skip_external());
        Ok(())
    }

    #[test]
    fn test_load_and_merge_config_rejects_invalid_cli_values() {
        let cli_config = CliConfig {
            no_config: true,
            timeout: Some(0),
            ..Default::default()
        };
        assert!(load_and_merge_config(&cli_config).is_err());
    }

    #[test]
    fn test_load_and_merge_config_missing_file() {
        let cli_config = CliConfig {
            config_file: Some("/no/such/dir/.doclinks.toml".to_string()),
            ..Default::default()
        };
        assert!(load_and_merge_config(&cli_config).is_err());
    }

    #[test]
    fn test_setup_output_settings() {
        let cli_config = CliConfig {
            quiet: true,
            ..Default::default()
        };
        let config = Config {
            output_format: Some("json".to_string()),
            ..Default::default()
        };
        let settings = setup_output_settings(&cli_config, &config);

        assert!(settings.quiet);
        assert!(!settings.show_progress);
        assert_eq!(settings.output_format, "json");
        assert!(create_progress_reporter(&settings).is_none());
    }

    #[test]
    fn test_create_progress_reporter_text_only() {
        let settings = OutputSettings {
            quiet: false,
            verbose: false,
            output_format: "markdown".to_string(),
            show_progress: true,
        };
        assert!(create_progress_reporter(&settings).is_none());

        let settings = OutputSettings {
            output_format: "text".to_string(),
            ..settings
        };
        assert!(create_progress_reporter(&settings).is_some());

        let settings = OutputSettings {
            output_format: "all".to_string(),
            ..settings
        };
        assert!(create_progress_reporter(&settings).is_some());
    }
}
