/// Application-wide constants to avoid magic values throughout the codebase.
///
/// This module centralizes all magic strings, numbers, and other literal values
/// used across the application, making them easier to maintain and modify.
/// Output format constants
pub mod output_formats {
    /// Text output format - colorful output grouped by file
    pub const TEXT: &str = "text";
    /// JSON output format - structured output for automation
    pub const JSON: &str = "json";
    /// Markdown output format - report suitable for committing or posting
    pub const MARKDOWN: &str = "markdown";
    /// Text on stdout plus JSON and markdown files next to the output base name
    pub const EVERY: &str = "all";

    /// Default output format
    pub const DEFAULT: &str = TEXT;

    /// All valid output formats
    pub const ALL: [&str; 4] = [TEXT, JSON, MARKDOWN, EVERY];
}

/// HTTP status code constants
pub mod http_status {
    /// HTTP 403 Forbidden - many hosts block automated probes
    pub const FORBIDDEN: u16 = 403;
    /// HTTP 405 Method Not Allowed - server rejects HEAD probes
    pub const METHOD_NOT_ALLOWED: u16 = 405;
    /// HTTP 429 Too Many Requests - server-side rate limiting
    pub const TOO_MANY_REQUESTS: u16 = 429;
}

/// Timeout and duration constants
pub mod timeouts {
    /// Default per-request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
    /// Maximum reasonable timeout in seconds (24 hours)
    pub const MAX_TIMEOUT_SECONDS: u64 = 86400;
    /// Minimum spacing between requests to the same host in milliseconds
    pub const DEFAULT_RATE_LIMIT_MS: u64 = 500;
    /// Base unit of the exponential backoff in milliseconds (`base * 2^attempt`)
    pub const DEFAULT_BACKOFF_BASE_MS: u64 = 1000;
}

/// Default configuration values
pub mod defaults {
    /// Attempts per external link, including the first one
    pub const RETRY_ATTEMPTS: u8 = 3;
    /// Maximum accepted retry attempts
    pub const MAX_RETRY_ATTEMPTS: u8 = 20;
    /// Maximum redirects followed by the HTTP client
    pub const MAX_REDIRECTS: usize = 5;
    /// Base name of the report files written by the `all` format
    pub const REPORT_BASE_NAME: &str = "link_report";
    /// Maximum accepted concurrency
    pub const MAX_CONCURRENCY: usize = 1000;
    /// Number of candidate anchors listed in a broken-anchor message
    pub const ANCHOR_SUGGESTIONS: usize = 5;
    /// Error details are truncated to this many characters
    pub const MESSAGE_DETAIL_CHARS: usize = 50;
    /// Config file looked up in the current and parent directories
    pub const CONFIG_FILE_NAME: &str = ".doclinks.toml";
}

/// Scanned file extensions, grouped by document format
pub mod files {
    pub const MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "markdown"];
    pub const NOTEBOOK_EXTENSIONS: [&str; 1] = ["ipynb"];
    pub const HTML_EXTENSIONS: [&str; 2] = ["html", "htm"];
    pub const LATEX_EXTENSIONS: [&str; 2] = ["tex", "latex"];

    /// Infrastructure directories never descended into
    pub const SKIPPED_DIRECTORIES: [&str; 6] =
        [".git", "__pycache__", "node_modules", ".venv", "venv", ".omc"];
}

/// Link classification patterns
pub mod patterns {
    /// Targets matching any of these (case-insensitive, anchored at the start)
    /// are never validated.
    pub const SKIP_SCHEMES: [&str; 6] = [
        r"^mailto:",
        r"^javascript:",
        r"^data:",
        r"^localhost",
        r"^127\.0\.0\.1",
        r"^file://",
    ];

    /// Markers of a template value that was never filled in (case-insensitive)
    pub const PLACEHOLDERS: [&str; 6] = [
        r"YOUR_USERNAME",
        r"yourusername",
        r"your-username",
        r"YOUR-USERNAME",
        r"\bTODO\b",
        r"^#$",
    ];

    /// Hosts serving hosted notebooks
    pub const COLAB_HOSTS: [&str; 2] = ["colab.research.google.com", "colab.google.com"];
}

/// Error message constants
pub mod error_messages {
    /// Fragments of transport errors that indicate a TLS failure
    pub const TLS_MARKERS: [&str; 4] = ["certificate", "tls", "ssl", "handshake"];
    /// Unknown error fallback
    pub const UNKNOWN_ERROR: &str = "Unknown error";
}
