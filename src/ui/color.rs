//! Color and formatting utilities for terminal output

use crate::core::types::ValidationStatus;

pub struct Colors;

impl Colors {
    pub const RESET: &'static str = "\x1b[0m";
    pub const BOLD: &'static str = "\x1b[1m";
    pub const DIM: &'static str = "\x1b[2m";

    pub const RED: &'static str = "\x1b[31m";
    pub const GREEN: &'static str = "\x1b[32m";
    pub const YELLOW: &'static str = "\x1b[33m";
    pub const BLUE: &'static str = "\x1b[34m";
    pub const CYAN: &'static str = "\x1b[36m";
}

/// Apply color to text if terminal supports it
pub fn colorize(text: &str, color: &str) -> String {
    if supports_formatting() {
        format!("{}{}{}", color, text, Colors::RESET)
    } else {
        text.to_string()
    }
}

/// Bold text if terminal supports it
pub fn bold(text: &str) -> String {
    colorize(text, Colors::BOLD)
}

/// Terminal color for a status label
pub fn status_color(status: ValidationStatus) -> &'static str {
    match status {
        ValidationStatus::Ok => Colors::GREEN,
        ValidationStatus::Broken | ValidationStatus::Error => Colors::RED,
        ValidationStatus::Placeholder | ValidationStatus::Timeout => Colors::YELLOW,
        ValidationStatus::Skipped => Colors::CYAN,
        ValidationStatus::Redirect => Colors::BLUE,
    }
}

/// Check if the current environment supports ANSI colors
pub fn supports_formatting() -> bool {
    // Check if colors are explicitly disabled
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    // Disable formatting when running tests
    if cfg!(test) || std::env::var("RUST_TEST_TIME_UNIT").is_ok() {
        return false;
    }

    match std::env::var("TERM") {
        Ok(term) => !(term == "dumb" || term.is_empty()),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_colorize_with_no_color() {
        unsafe {
            std::env::set_var("NO_COLOR", "1");
        }
        assert_eq!(colorize("test", Colors::RED), "test");
        assert_eq!(bold("test"), "test");
        unsafe {
            std::env::remove_var("NO_COLOR");
        }
    }

    #[test]
    #[serial]
    fn test_supports_formatting_with_dumb_term() {
        let original_term = std::env::var("TERM").ok();
        unsafe {
            std::env::set_var("TERM", "dumb");
        }
        assert!(!supports_formatting());
        unsafe {
            match original_term {
                Some(term) => std::env::set_var("TERM", term),
                None => std::env::remove_var("TERM"),
            }
        }
    }

    #[test]
    fn test_status_color() {
        assert_eq!(status_color(ValidationStatus::Ok), Colors::GREEN);
        assert_eq!(status_color(ValidationStatus::Broken), Colors::RED);
        assert_eq!(status_color(ValidationStatus::Error), Colors::RED);
        assert_eq!(status_color(ValidationStatus::Timeout), Colors::YELLOW);
        assert_eq!(status_color(ValidationStatus::Skipped), Colors::CYAN);
    }
}
