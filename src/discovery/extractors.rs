//! Format-specific link extraction
//!
//! Extractors only parse text. They never touch the network or check whether
//! a target exists.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use crate::core::constants::files;
use crate::core::error::{DocLinksError, Result};
use crate::core::types::{Locator, RawLink};

use std::path::Path;

static MARKDOWN_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\]]*)\]\(([^)]+)\)").expect("Failed to compile markdown link pattern")
});

static MARKDOWN_AUTOLINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(https?://[^>]+)>").expect("Failed to compile markdown autolink pattern")
});

static HTML_HREF: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r#"href=["']([^"']+)["']"#)
        .case_insensitive(true)
        .build()
        .expect("Failed to compile href pattern")
});

static HTML_SRC: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r#"src=["']([^"']+)["']"#)
        .case_insensitive(true)
        .build()
        .expect("Failed to compile src pattern")
});

static LATEX_HREF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\href\{([^}]+)\}\{[^}]*\}").expect("Failed to compile \\href pattern")
});

static LATEX_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\url\{([^}]+)\}").expect("Failed to compile \\url pattern"));

static BARE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s'"<>]+"#).expect("Failed to compile URL pattern"));

/// Characters stripped from the end of a bare URL found in code.
const TRAILING_PUNCTUATION: [char; 5] = ['.', ',', ';', ':', ')'];

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentFormat {
    Markdown,
    Notebook,
    Html,
    Latex,
}

impl DocumentFormat {
    /// Formats in scan order.
    pub const ALL: [DocumentFormat; 4] = [
        DocumentFormat::Markdown,
        DocumentFormat::Notebook,
        DocumentFormat::Html,
        DocumentFormat::Latex,
    ];

    /// Detect the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        let extension = extension.as_str();

        if files::MARKDOWN_EXTENSIONS.contains(&extension) {
            Some(DocumentFormat::Markdown)
        } else if files::NOTEBOOK_EXTENSIONS.contains(&extension) {
            Some(DocumentFormat::Notebook)
        } else if files::HTML_EXTENSIONS.contains(&extension) {
            Some(DocumentFormat::Html)
        } else if files::LATEX_EXTENSIONS.contains(&extension) {
            Some(DocumentFormat::Latex)
        } else {
            None
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DocumentFormat::Markdown => "markdown",
            DocumentFormat::Notebook => "notebook",
            DocumentFormat::Html => "html",
            DocumentFormat::Latex => "latex",
        }
    }

    /// Extract every link occurrence from `content`, owned by `document`.
    ///
    /// Only notebooks can fail, when the container does not parse.
    pub fn extract(self, content: &str, document: &Path) -> Result<Vec<RawLink>> {
        match self {
            DocumentFormat::Markdown => Ok(extract_markdown(content, document)),
            DocumentFormat::Notebook => extract_notebook(content, document),
            DocumentFormat::Html => Ok(extract_html(content, document)),
            DocumentFormat::Latex => Ok(extract_latex(content, document)),
        }
    }
}

/// Inline `[text](target "title")` links and `<https://...>` autolinks, by line.
pub fn extract_markdown(content: &str, document: &Path) -> Vec<RawLink> {
    let mut links = Vec::new();

    for (index, line) in content.split('\n').enumerate() {
        let locator = Locator::Line(index as u64 + 1);

        for captures in MARKDOWN_LINK.captures_iter(line) {
            let text = &captures[1];
            let target = strip_title(&captures[2]);
            if target.is_empty() {
                continue;
            }
            links.push(RawLink::new(target, document, locator, text));
        }

        for captures in MARKDOWN_AUTOLINK.captures_iter(line) {
            links.push(RawLink::new(&captures[1], document, locator, ""));
        }
    }

    links
}

/// Drop a trailing quoted title: `url "Title"` -> `url`.
fn strip_title(raw: &str) -> &str {
    raw.split_whitespace()
        .next()
        .unwrap_or("")
        .trim_matches(|c| c == '"' || c == '\'')
}

#[derive(Debug, Deserialize)]
struct Notebook {
    #[serde(default)]
    cells: Vec<NotebookCell>,
}

#[derive(Debug, Deserialize)]
struct NotebookCell {
    #[serde(default)]
    cell_type: String,
    #[serde(default)]
    source: CellSource,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CellSource {
    Lines(Vec<String>),
    Text(String),
}

impl Default for CellSource {
    fn default() -> Self {
        CellSource::Text(String::new())
    }
}

impl CellSource {
    fn joined(&self) -> String {
        match self {
            CellSource::Lines(lines) => lines.concat(),
            CellSource::Text(text) => text.clone(),
        }
    }
}

/// Links from a notebook container, located by 1-based cell index.
///
/// Markdown cells go through the markdown extractor. Code cells are scanned
/// for bare absolute URLs only.
pub fn extract_notebook(content: &str, document: &Path) -> Result<Vec<RawLink>> {
    let notebook: Notebook = serde_json::from_str(content).map_err(|e| {
        DocLinksError::Parse(format!("Could not parse {}: {e}", document.display()))
    })?;

    let mut links = Vec::new();

    for (index, cell) in notebook.cells.iter().enumerate() {
        let locator = Locator::Cell(index as u64 + 1);
        let source = cell.source.joined();

        match cell.cell_type.as_str() {
            "markdown" => {
                links.extend(extract_markdown(&source, document).into_iter().map(|mut link| {
                    link.locator = locator;
                    link
                }));
            }
            "code" => {
                for found in BARE_URL.find_iter(&source) {
                    let target = found.as_str().trim_end_matches(TRAILING_PUNCTUATION);
                    links.push(RawLink::new(target, document, locator, ""));
                }
            }
            _ => {}
        }
    }

    Ok(links)
}

/// The markdown text of a notebook, cells joined by newlines.
pub fn notebook_markdown(content: &str) -> Result<String> {
    let notebook: Notebook = serde_json::from_str(content)?;

    Ok(notebook
        .cells
        .iter()
        .filter(|cell| cell.cell_type == "markdown")
        .map(|cell| cell.source.joined())
        .collect::<Vec<_>>()
        .join("\n"))
}

/// `href` and `src` attribute values, by line.
pub fn extract_html(content: &str, document: &Path) -> Vec<RawLink> {
    extract_by_line(content, document, &[&*HTML_HREF, &*HTML_SRC])
}

/// `\href{target}{text}` and `\url{target}`, by line.
pub fn extract_latex(content: &str, document: &Path) -> Vec<RawLink> {
    extract_by_line(content, document, &[&*LATEX_HREF, &*LATEX_URL])
}

fn extract_by_line(content: &str, document: &Path, patterns: &[&Regex]) -> Vec<RawLink> {
    let mut links = Vec::new();

    for (index, line) in content.split('\n').enumerate() {
        let locator = Locator::Line(index as u64 + 1);
        for pattern in patterns {
            for captures in pattern.captures_iter(line) {
                links.push(RawLink::new(&captures[1], document, locator, ""));
            }
        }
    }

    links
}
