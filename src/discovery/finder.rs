use log::{debug, info, warn};
use rayon::prelude::*;

use crate::core::error::Result;
use crate::core::types::{Link, LinkCategory, RawLink};
use crate::discovery::categorizer::classify;
use crate::discovery::extractors::DocumentFormat;
use crate::discovery::path_utils::discover_files;

use std::fs;
use std::path::{Path, PathBuf};

/// A per-file problem that did not stop the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    pub path: PathBuf,
    pub message: String,
}

/// Everything found under a scan root.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Categorized links, grouped by format then ordered by file and position
    pub links: Vec<Link>,
    pub warnings: Vec<ScanWarning>,
    pub files_scanned: usize,
}

pub trait LinkFinder {
    fn discover(&self, root: &Path) -> Result<Discovery>;
}

#[derive(Default, Debug)]
pub struct Finder {
    ignored_dirs: Vec<String>,
}

impl LinkFinder for Finder {
    fn discover(&self, root: &Path) -> Result<Discovery> {
        let walk = discover_files(root, &self.ignored_dirs)?;

        let files: Vec<(DocumentFormat, PathBuf)> = walk
            .files
            .into_iter()
            .flat_map(|(format, paths)| paths.into_iter().map(move |path| (format, path)))
            .collect();

        info!("Scanning {} file(s) under {}", files.len(), root.display());

        // Extraction is independent per file; collect keeps the walk order.
        let per_file: Vec<std::result::Result<Vec<RawLink>, ScanWarning>> = files
            .par_iter()
            .map(|(format, path)| Self::scan_file(*format, path))
            .collect();

        let mut discovery = Discovery {
            files_scanned: files.len(),
            warnings: walk.warnings,
            ..Default::default()
        };

        for result in per_file {
            match result {
                Ok(raw_links) => discovery.links.extend(Self::categorize(raw_links)),
                Err(warning) => {
                    warn!("{}: {}", warning.path.display(), warning.message);
                    discovery.warnings.push(warning);
                }
            }
        }

        info!(
            "Found {} link(s) in {} file(s)",
            discovery.links.len(),
            discovery.files_scanned
        );

        Ok(discovery)
    }
}

impl Finder {
    pub fn new(ignored_dirs: Vec<String>) -> Self {
        Self { ignored_dirs }
    }

    fn scan_file(
        format: DocumentFormat,
        path: &Path,
    ) -> std::result::Result<Vec<RawLink>, ScanWarning> {
        let content = fs::read_to_string(path).map_err(|e| ScanWarning {
            path: path.to_path_buf(),
            message: format!("Error reading file: {e}"),
        })?;

        let links = format.extract(&content, path).map_err(|e| ScanWarning {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        debug!(
            "{} ({}): {} link(s)",
            path.display(),
            format.name(),
            links.len()
        );
        Ok(links)
    }

    /// Attach a category to every raw occurrence. Blank targets are dropped.
    pub fn categorize(raw_links: Vec<RawLink>) -> Vec<Link> {
        raw_links
            .into_iter()
            .filter_map(|raw| {
                let category = classify(&raw.target);
                let location = format!("{}:{}", raw.document.display(), raw.locator);
                Link::from_raw(raw, category)
                    .inspect_err(|e| debug!("Skipping link at {location}: {e}"))
                    .ok()
            })
            .collect()
    }
}

/// Keep only links whose category is in `categories`. `None` keeps everything.
pub fn filter_categories(links: Vec<Link>, categories: Option<&[LinkCategory]>) -> Vec<Link> {
    match categories {
        Some(allowed) => links
            .into_iter()
            .filter(|link| allowed.contains(&link.category()))
            .collect(),
        None => links,
    }
}
