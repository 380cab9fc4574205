//! Link discovery and file processing
//!
//! This module walks the document tree, extracts link occurrences from each
//! supported format and assigns every link its category.

pub mod categorizer;
pub mod extractors;
pub mod finder;
pub mod path_utils;

// Re-export commonly used items
pub use categorizer::classify;
pub use extractors::DocumentFormat;
pub use finder::{Discovery, Finder, LinkFinder, ScanWarning, filter_categories};
pub use path_utils::{FileWalk, discover_files};
