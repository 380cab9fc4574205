//! Link validation logic
//!
//! This module dispatches each categorized link to the routine for its
//! category and caches every outcome for the rest of the run.

pub mod anchor;
pub mod external;
pub mod internal;
pub mod rate_limiter;
pub mod validator;

// Re-export commonly used items
pub use anchor::slugify;
pub use external::ExternalChecker;
pub use internal::resolve_target_path;
pub use rate_limiter::RateLimiter;
pub use validator::{ValidateLinks, Validator};

use crate::core::constants::defaults;

/// First characters of an error description, for result messages.
pub(crate) fn truncate_detail(detail: &str) -> String {
    detail.chars().take(defaults::MESSAGE_DETAIL_CHARS).collect()
}
