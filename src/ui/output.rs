//! Report rendering for doclinks
//!
//! Renderers are pure: they turn results into a `String` and leave writing
//! to [`write_report`].

use serde::Serialize;

use crate::core::constants::{defaults, output_formats};
use crate::core::error::{DocLinksError, Result};
use crate::core::types::{Locator, ResultRecord, ValidationResult, ValidationStatus};
use crate::discovery::ScanWarning;
use crate::reporting::summary::{Summary, issues};
use crate::ui::color::{Colors, bold, colorize, status_color};

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const RULE_WIDTH: usize = 70;
const TEXT_URL_CHARS: usize = 70;

/// Run details shown alongside the results
#[derive(Debug, Clone)]
pub struct DisplayMetadata {
    pub generated_at: String,
    pub files_scanned: usize,
    pub warnings: Vec<ScanWarning>,
}

impl DisplayMetadata {
    pub fn new(files_scanned: usize, warnings: Vec<ScanWarning>) -> Self {
        Self {
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            files_scanned,
            warnings,
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: &'a str,
    summary: Summary,
    issues: Vec<ResultRecord>,
    all_results: Vec<ResultRecord>,
}

/// Render results in the requested format
pub fn render(
    format: &str,
    results: &[ValidationResult],
    metadata: &DisplayMetadata,
) -> Result<String> {
    match format {
        output_formats::TEXT => Ok(render_text(results, metadata)),
        output_formats::JSON => render_json(results, metadata),
        output_formats::MARKDOWN => Ok(render_markdown(results, metadata)),
        output_formats::EVERY => Err(DocLinksError::InvalidArgument(
            "Format 'all' produces several reports".to_string(),
        )),
        other => Err(DocLinksError::InvalidArgument(format!(
            "Unknown output format '{other}'"
        ))),
    }
}

/// Render and write the reports for `format`.
///
/// `all` prints the text report and writes `<base>.json` and `<base>.md`,
/// where `base` is `output` or `link_report` in the working directory.
/// Every other format is a single report on stdout or in `output`.
pub fn emit_reports(
    format: &str,
    results: &[ValidationResult],
    metadata: &DisplayMetadata,
    output: Option<&Path>,
) -> Result<()> {
    if format != output_formats::EVERY {
        let report = render(format, results, metadata)?;
        return write_report(&report, output);
    }

    let base = output.map_or_else(|| PathBuf::from(defaults::REPORT_BASE_NAME), Path::to_path_buf);
    write_report(&render_text(results, metadata), None)?;
    write_report(
        &render_json(results, metadata)?,
        Some(&base.with_extension("json")),
    )?;
    write_report(
        &render_markdown(results, metadata),
        Some(&base.with_extension("md")),
    )
}

/// Print to stdout, or write to `output` when given
pub fn write_report(report: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, report)?;
            eprintln!("Report written to: {}", path.display());
        }
        None => println!("{report}"),
    }
    Ok(())
}

fn locator_label(locator: Locator) -> String {
    match locator {
        Locator::Line(n) => format!("Line {n}"),
        Locator::Cell(n) => format!("Cell {n}"),
    }
}

fn issues_by_file(results: &[ValidationResult]) -> BTreeMap<String, Vec<&ValidationResult>> {
    let mut by_file: BTreeMap<String, Vec<&ValidationResult>> = BTreeMap::new();
    for issue in issues(results) {
        by_file
            .entry(issue.link().document().display().to_string())
            .or_default()
            .push(issue);
    }
    by_file
}

/// Console report grouped by file
pub fn render_text(results: &[ValidationResult], metadata: &DisplayMetadata) -> String {
    let summary = Summary::from_results(results);
    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = vec![
        String::new(),
        rule.clone(),
        bold("LINK CHECK REPORT"),
        rule.clone(),
        String::new(),
        bold("Summary:"),
        format!("  Files scanned: {}", metadata.files_scanned),
        format!("  Total links scanned: {}", summary.total),
        String::new(),
        format!("  {}", bold("By Status:")),
    ];

    for (status, count) in &summary.by_status {
        lines.push(format!(
            "    {}",
            colorize(&format!("{status}: {count}"), status_color(*status))
        ));
    }

    lines.push(String::new());
    lines.push(format!("  {}", bold("By Category:")));
    for (category, count) in &summary.by_category {
        lines.push(format!("    {category}: {count}"));
    }

    if !metadata.warnings.is_empty() {
        lines.push(String::new());
        lines.push(bold("Skipped Files:"));
        for warning in &metadata.warnings {
            lines.push(format!(
                "  {}: {}",
                warning.path.display(),
                colorize(&warning.message, Colors::DIM)
            ));
        }
    }

    let by_file = issues_by_file(results);
    if by_file.is_empty() {
        lines.push(String::new());
        lines.push(colorize("No issues found!", Colors::GREEN));
    } else {
        lines.push(String::new());
        lines.push(bold("Issues Found:"));
        lines.push("-".repeat(RULE_WIDTH));

        for (file, file_issues) in by_file {
            lines.push(String::new());
            lines.push(bold(&file));
            for issue in file_issues {
                let target: String = issue.link().target().chars().take(TEXT_URL_CHARS).collect();
                lines.push(format!(
                    "  {}: {}",
                    locator_label(issue.link().locator()),
                    colorize(&format!("[{}]", issue.status()), status_color(issue.status()))
                ));
                lines.push(format!("    URL: {target}"));
                lines.push(format!("    {}", issue.message()));
            }
        }
    }

    lines.push(String::new());
    lines.push(rule);
    lines.join("\n")
}

/// Machine-readable report with every result
pub fn render_json(results: &[ValidationResult], metadata: &DisplayMetadata) -> Result<String> {
    let report = JsonReport {
        generated_at: &metadata.generated_at,
        summary: Summary::from_results(results),
        issues: issues(results).iter().map(|r| r.to_record()).collect(),
        all_results: results.iter().map(ValidationResult::to_record).collect(),
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

/// Markdown report suitable for committing or posting
pub fn render_markdown(results: &[ValidationResult], metadata: &DisplayMetadata) -> String {
    let summary = Summary::from_results(results);
    let mut lines = vec![
        "# Link Check Report".to_string(),
        String::new(),
        format!("Generated: {}", metadata.generated_at),
        String::new(),
        "## Summary".to_string(),
        String::new(),
        format!("Total links scanned: **{}**", summary.total),
        String::new(),
        "### By Status".to_string(),
        String::new(),
        "| Status | Count |".to_string(),
        "|--------|-------|".to_string(),
    ];
    for (status, count) in &summary.by_status {
        lines.push(format!("| {status} | {count} |"));
    }

    lines.extend([
        String::new(),
        "### By Category".to_string(),
        String::new(),
        "| Category | Count |".to_string(),
        "|----------|-------|".to_string(),
    ]);
    for (category, count) in &summary.by_category {
        lines.push(format!("| {category} | {count} |"));
    }
    lines.push(String::new());

    let by_file = issues_by_file(results);
    if by_file.is_empty() {
        lines.push("## No Issues Found".to_string());
        lines.push(String::new());
        lines.push("All links validated successfully!".to_string());
    } else {
        lines.push("## Issues".to_string());
        lines.push(String::new());

        for (file, file_issues) in by_file {
            lines.push(format!("### `{file}`"));
            lines.push(String::new());
            for issue in file_issues {
                let emoji = match issue.status() {
                    ValidationStatus::Broken => ":x:",
                    ValidationStatus::Placeholder => ":warning:",
                    ValidationStatus::Timeout => ":hourglass:",
                    _ => ":exclamation:",
                };
                lines.push(format!(
                    "- **{}** {emoji} `{}`",
                    locator_label(issue.link().locator()),
                    issue.status()
                ));
                lines.push(format!("  - URL: `{}`", issue.link().target()));
                lines.push(format!("  - {}", issue.message()));
            }
            lines.push(String::new());
        }
    }

    lines.join("\n")
}
