use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use log::warn;

use crate::core::constants::files;
use crate::core::error::{DocLinksError, Result};
use crate::discovery::extractors::DocumentFormat;
use crate::discovery::finder::ScanWarning;

/// Files to scan, grouped by format. Each group is sorted by path.
pub type FilesByFormat = BTreeMap<DocumentFormat, Vec<PathBuf>>;

/// Result of walking a scan root.
#[derive(Debug, Default)]
pub struct FileWalk {
    pub files: FilesByFormat,
    /// Entries the walker could not read. They are skipped, not fatal.
    pub warnings: Vec<ScanWarning>,
}

/// Walk `root` once and group every scannable file by format.
///
/// Infrastructure directories (`.git`, `node_modules`, virtual environments...)
/// and any name in `extra_ignored` are not descended into. Ignore files such as
/// `.gitignore` are not consulted. Only a missing or non-directory root is an
/// error; unreadable entries below it become warnings.
pub fn discover_files(root: &Path, extra_ignored: &[String]) -> Result<FileWalk> {
    if !root.is_dir() {
        return Err(DocLinksError::ScanRoot(root.display().to_string()));
    }

    let skipped: HashSet<String> = files::SKIPPED_DIRECTORIES
        .iter()
        .map(|name| name.to_string())
        .chain(extra_ignored.iter().cloned())
        .collect();

    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            !(is_dir && entry.depth() > 0 && skipped.contains(&*entry.file_name().to_string_lossy()))
        });

    let mut walk = FileWalk::default();

    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = error_path(&err).unwrap_or_else(|| root.to_path_buf());
                warn!("Skipping {}: {}", path.display(), err);
                walk.warnings.push(ScanWarning {
                    path,
                    message: format!("Could not read directory entry: {err}"),
                });
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        if let Some(format) = DocumentFormat::from_path(path) {
            walk.files.entry(format).or_default().push(path.to_path_buf());
        }
    }

    Ok(walk)
}

/// The path a walk error refers to, when the walker recorded one.
fn error_path(err: &ignore::Error) -> Option<PathBuf> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.clone()),
        ignore::Error::Loop { child, .. } => Some(child.clone()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        ignore::Error::Partial(errs) => errs.iter().find_map(error_path),
        _ => None,
    }
}
