//! Link classification
//!
//! Maps a raw target string to a [`LinkCategory`]. The checks run in a fixed
//! order: placeholder, colab, anchor, external, internal. A placeholder that
//! looks like a URL is still a placeholder.

use once_cell::sync::Lazy;
use regex::{Regex, RegexSet, RegexSetBuilder};

use crate::core::constants::patterns;
use crate::core::types::LinkCategory;

static PLACEHOLDER_SET: Lazy<RegexSet> = Lazy::new(|| {
    RegexSetBuilder::new(patterns::PLACEHOLDERS)
        .case_insensitive(true)
        .build()
        .expect("Failed to compile placeholder patterns")
});

static SKIP_SET: Lazy<RegexSet> = Lazy::new(|| {
    RegexSetBuilder::new(patterns::SKIP_SCHEMES)
        .case_insensitive(true)
        .build()
        .expect("Failed to compile skip patterns")
});

static EXTERNAL_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://").expect("Failed to compile scheme pattern"));

/// Contains a known template marker, or is exactly `#`.
pub fn is_placeholder(target: &str) -> bool {
    PLACEHOLDER_SET.is_match(target)
}

pub fn is_colab(target: &str) -> bool {
    patterns::COLAB_HOSTS.iter().any(|host| target.contains(host))
}

/// Same-document heading reference. A lone `#` is not an anchor.
pub fn is_anchor(target: &str) -> bool {
    target.starts_with('#') && target.len() > 1
}

pub fn is_external(target: &str) -> bool {
    EXTERNAL_SCHEME.is_match(target)
}

/// Matches the skip-scheme list (mail, script and data URIs, loopback, local files).
pub fn should_skip(target: &str) -> bool {
    SKIP_SET.is_match(target)
}

pub fn is_internal(target: &str) -> bool {
    !is_external(target) && !is_anchor(target) && !should_skip(target)
}

/// Classify a raw target. Pure: the same string always yields the same category.
pub fn classify(target: &str) -> LinkCategory {
    if is_placeholder(target) {
        LinkCategory::Placeholder
    } else if is_colab(target) {
        LinkCategory::Colab
    } else if is_anchor(target) {
        LinkCategory::Anchor
    } else if is_external(target) {
        LinkCategory::External
    } else if is_internal(target) {
        LinkCategory::Internal
    } else {
        LinkCategory::Unknown
    }
}
