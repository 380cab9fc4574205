use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Target kind of a discovered link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkCategory {
    /// Absolute http/https target
    External,
    /// Hosted notebook link, checked like an external one
    Colab,
    /// Relative filesystem path
    Internal,
    /// Heading reference in the same document
    Anchor,
    /// Known not-yet-filled template value
    Placeholder,
    /// None of the above
    Unknown,
}

impl LinkCategory {
    /// All categories in reporting order.
    pub const ALL: [LinkCategory; 6] = [
        LinkCategory::External,
        LinkCategory::Internal,
        LinkCategory::Anchor,
        LinkCategory::Colab,
        LinkCategory::Placeholder,
        LinkCategory::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LinkCategory::External => "external",
            LinkCategory::Colab => "colab",
            LinkCategory::Internal => "internal",
            LinkCategory::Anchor => "anchor",
            LinkCategory::Placeholder => "placeholder",
            LinkCategory::Unknown => "unknown",
        }
    }

    /// Whether links of this category are checked over the network.
    pub fn is_external(self) -> bool {
        matches!(self, LinkCategory::External | LinkCategory::Colab)
    }
}

impl fmt::Display for LinkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LinkCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Unknown link category '{s}'. Expected one of: {}.",
                    LinkCategory::ALL.map(LinkCategory::as_str).join(", ")
                )
            })
    }
}

/// Terminal status of a validated link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Ok,
    /// Definitive negative resolution (404-class, file absent, anchor absent)
    Broken,
    Placeholder,
    Timeout,
    /// Indeterminate outcome (transport failure, exhausted retries, bad input)
    Error,
    Skipped,
    Redirect,
}

impl ValidationStatus {
    /// All statuses in reporting order.
    pub const ALL: [ValidationStatus; 7] = [
        ValidationStatus::Ok,
        ValidationStatus::Broken,
        ValidationStatus::Placeholder,
        ValidationStatus::Timeout,
        ValidationStatus::Error,
        ValidationStatus::Skipped,
        ValidationStatus::Redirect,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ValidationStatus::Ok => "ok",
            ValidationStatus::Broken => "broken",
            ValidationStatus::Placeholder => "placeholder",
            ValidationStatus::Timeout => "timeout",
            ValidationStatus::Error => "error",
            ValidationStatus::Skipped => "skipped",
            ValidationStatus::Redirect => "redirect",
        }
    }

    /// Statuses that make the run fail.
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            ValidationStatus::Broken | ValidationStatus::Placeholder | ValidationStatus::Error
        )
    }

    /// Statuses listed as issues in reports. Timeouts are reported but do not fail the run.
    pub fn is_issue(self) -> bool {
        self.is_failure() || self == ValidationStatus::Timeout
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of a link inside its document.
///
/// Markup, web and typeset documents are located by line; notebooks by cell.
/// Both are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locator {
    Line(u64),
    Cell(u64),
}

impl Locator {
    pub fn number(self) -> u64 {
        match self {
            Locator::Line(n) | Locator::Cell(n) => n,
        }
    }

    pub fn kind(self) -> &'static str {
        match self {
            Locator::Line(_) => "line",
            Locator::Cell(_) => "cell",
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Line(n) => write!(f, "L{n}"),
            Locator::Cell(n) => write!(f, "cell {n}"),
        }
    }
}

/// An unclassified link occurrence as produced by an extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLink {
    pub target: String,
    pub document: PathBuf,
    pub locator: Locator,
    pub text: String,
}

impl RawLink {
    pub fn new<T, S>(target: T, document: &Path, locator: Locator, text: S) -> Self
    where
        T: Into<String>,
        S: Into<String>,
    {
        Self {
            target: target.into(),
            document: document.to_path_buf(),
            locator,
            text: text.into(),
        }
    }
}

/// A categorized link. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    target: String,
    document: PathBuf,
    locator: Locator,
    text: String,
    category: LinkCategory,
}

/// Builder for creating `Link` instances with validation.
#[derive(Debug, Default)]
pub struct LinkBuilder {
    target: Option<String>,
    document: Option<PathBuf>,
    locator: Option<Locator>,
    text: Option<String>,
    category: Option<LinkCategory>,
}

/// Errors that can occur when building a `Link`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// Target is missing or empty
    MissingTarget,
    /// Owning document is missing
    MissingDocument,
    /// Locator is missing
    MissingLocator,
    /// Locator number is invalid (zero)
    InvalidLocator,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTarget => write!(f, "Link target is required and cannot be empty"),
            Self::MissingDocument => write!(f, "Owning document is required"),
            Self::MissingLocator => write!(f, "Locator is required"),
            Self::InvalidLocator => write!(f, "Locator must be greater than 0"),
        }
    }
}

impl std::error::Error for LinkError {}

impl Link {
    /// Create a builder for constructing Link instances.
    pub fn builder() -> LinkBuilder {
        LinkBuilder::default()
    }

    /// Attach a category to a raw occurrence.
    pub fn from_raw(raw: RawLink, category: LinkCategory) -> Result<Self, LinkError> {
        Self::builder()
            .target(raw.target)
            .document(raw.document)
            .locator(raw.locator)
            .text(raw.text)
            .category(category)
            .build()
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn document(&self) -> &Path {
        &self.document
    }

    pub fn locator(&self) -> Locator {
        self.locator
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn category(&self) -> LinkCategory {
        self.category
    }
}

impl LinkBuilder {
    pub fn target<S: Into<String>>(mut self, target: S) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn document<P: Into<PathBuf>>(mut self, document: P) -> Self {
        self.document = Some(document.into());
        self
    }

    pub fn locator(mut self, locator: Locator) -> Self {
        self.locator = Some(locator);
        self
    }

    pub fn text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn category(mut self, category: LinkCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Build the Link, validating all required fields.
    ///
    /// A missing category yields `LinkCategory::Unknown`.
    pub fn build(self) -> Result<Link, LinkError> {
        let target = self.target.ok_or(LinkError::MissingTarget)?;
        if target.trim().is_empty() {
            return Err(LinkError::MissingTarget);
        }
        let document = self.document.ok_or(LinkError::MissingDocument)?;
        let locator = self.locator.ok_or(LinkError::MissingLocator)?;
        if locator.number() == 0 {
            return Err(LinkError::InvalidLocator);
        }

        Ok(Link {
            target: target.trim().to_string(),
            document,
            locator,
            text: self.text.unwrap_or_default(),
            category: self.category.unwrap_or(LinkCategory::Unknown),
        })
    }
}

/// The cacheable part of a validation: everything except the link it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: ValidationStatus,
    pub message: String,
    pub response_code: Option<u16>,
    pub redirect: Option<String>,
}

impl Outcome {
    pub fn new<S: Into<String>>(status: ValidationStatus, message: S) -> Self {
        Self {
            status,
            message: message.into(),
            response_code: None,
            redirect: None,
        }
    }

    pub fn with_code(mut self, code: u16) -> Self {
        self.response_code = Some(code);
        self
    }

    pub fn with_redirect(mut self, redirect: Option<String>) -> Self {
        self.redirect = redirect;
        self
    }

    /// Produce a fresh result for `link` carrying this outcome.
    pub fn bind(&self, link: &Link) -> ValidationResult {
        ValidationResult {
            link: link.clone(),
            outcome: self.clone(),
        }
    }
}

/// Outcome of validating exactly one link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    link: Link,
    outcome: Outcome,
}

impl ValidationResult {
    pub fn link(&self) -> &Link {
        &self.link
    }

    pub fn status(&self) -> ValidationStatus {
        self.outcome.status
    }

    pub fn message(&self) -> &str {
        &self.outcome.message
    }

    pub fn response_code(&self) -> Option<u16> {
        self.outcome.response_code
    }

    pub fn redirect(&self) -> Option<&str> {
        self.outcome.redirect.as_deref()
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn is_issue(&self) -> bool {
        self.status().is_issue()
    }

    pub fn to_record(&self) -> ResultRecord {
        ResultRecord {
            url: self.link.target.clone(),
            source_file: self.link.document.display().to_string(),
            line_number: self.link.locator.number(),
            locator: self.link.locator.kind(),
            link_text: self.link.text.clone(),
            category: self.link.category,
            status: self.outcome.status,
            message: self.outcome.message.clone(),
            response_code: self.outcome.response_code,
            redirect_url: self.outcome.redirect.clone(),
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} - {} - {} - {}",
            self.outcome.status,
            self.link.target,
            self.outcome.message,
            self.link.document.display(),
            self.link.locator
        )
    }
}

/// Flat, serializable view of a result for report sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    pub url: String,
    pub source_file: String,
    pub line_number: u64,
    pub locator: &'static str,
    pub link_text: String,
    pub category: LinkCategory,
    pub status: ValidationStatus,
    pub message: String,
    pub response_code: Option<u16>,
    pub redirect_url: Option<String>,
}
