use std::fmt;

/// Error types for doclinks operations
#[derive(Debug)]
pub enum DocLinksError {
    /// IO error (file operations, etc.)
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// HTTP client error
    Http(reqwest::Error),

    /// Regex compilation error
    Regex(regex::Error),

    /// TOML parsing error
    TomlParsing(toml::de::Error),

    /// JSON parsing or serialization error
    Json(serde_json::Error),

    /// Document could not be parsed into links
    Parse(String),

    /// Scan root is missing or not a directory
    ScanRoot(String),

    /// Invalid argument error
    InvalidArgument(String),

    /// File walking/ignore error
    FileWalking(ignore::Error),
}

impl fmt::Display for DocLinksError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocLinksError::Io(err) => write!(f, "IO error: {err}"),
            DocLinksError::Config(msg) => write!(f, "Configuration error: {msg}"),
            DocLinksError::Http(err) => write!(f, "HTTP error: {err}"),
            DocLinksError::Regex(err) => write!(f, "Regex error: {err}"),
            DocLinksError::TomlParsing(err) => write!(f, "TOML parsing error: {err}"),
            DocLinksError::Json(err) => write!(f, "JSON error: {err}"),
            DocLinksError::Parse(msg) => write!(f, "Parse error: {msg}"),
            DocLinksError::ScanRoot(path) => write!(f, "Scan root not found: {path}"),
            DocLinksError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            DocLinksError::FileWalking(err) => write!(f, "File walking error: {err}"),
        }
    }
}

impl std::error::Error for DocLinksError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DocLinksError::Io(err) => Some(err),
            DocLinksError::Http(err) => Some(err),
            DocLinksError::Regex(err) => Some(err),
            DocLinksError::TomlParsing(err) => Some(err),
            DocLinksError::Json(err) => Some(err),
            DocLinksError::FileWalking(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DocLinksError {
    fn from(err: std::io::Error) -> Self {
        DocLinksError::Io(err)
    }
}

impl From<reqwest::Error> for DocLinksError {
    fn from(err: reqwest::Error) -> Self {
        DocLinksError::Http(err)
    }
}

impl From<regex::Error> for DocLinksError {
    fn from(err: regex::Error) -> Self {
        DocLinksError::Regex(err)
    }
}

impl From<toml::de::Error> for DocLinksError {
    fn from(err: toml::de::Error) -> Self {
        DocLinksError::TomlParsing(err)
    }
}

impl From<serde_json::Error> for DocLinksError {
    fn from(err: serde_json::Error) -> Self {
        DocLinksError::Json(err)
    }
}

impl From<ignore::Error> for DocLinksError {
    fn from(err: ignore::Error) -> Self {
        DocLinksError::FileWalking(err)
    }
}

/// Type alias for Results using DocLinksError
pub type Result<T> = std::result::Result<T, DocLinksError>;
