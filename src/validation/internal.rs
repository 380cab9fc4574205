use crate::core::error::{DocLinksError, Result};
use crate::core::types::{Link, Outcome, ValidationStatus};
use crate::validation::truncate_detail;

use std::path::{Component, Path, PathBuf};

/// Resolve a relative link target to a filesystem path.
///
/// The target is percent-decoded and stripped of any query string and
/// fragment. A leading `/` resolves against `root`, anything else against the
/// directory of `document`. `.` and `..` are folded lexically.
pub fn resolve_target_path(target: &str, document: &Path, root: &Path) -> Result<PathBuf> {
    let decoded = urlencoding::decode(target)
        .map_err(|e| DocLinksError::Parse(format!("Invalid percent-encoding in '{target}': {e}")))?;

    let path_part = decoded
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .replace('\\', "/");

    let joined = match path_part.strip_prefix('/') {
        Some(from_root) => root.join(from_root.trim_start_matches('/')),
        None => document
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&path_part),
    };

    Ok(normalize(&joined))
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}

/// Check that a relative link points at an existing file or directory.
pub fn validate_internal(link: &Link, root: &Path) -> Outcome {
    let resolved = match resolve_target_path(link.target(), link.document(), root) {
        Ok(path) => path,
        Err(e) => {
            return Outcome::new(
                ValidationStatus::Error,
                format!("Path error: {}", truncate_detail(&e.to_string())),
            );
        }
    };

    match resolved.try_exists() {
        Ok(true) => Outcome::new(ValidationStatus::Ok, "File exists"),
        Ok(false) => Outcome::new(
            ValidationStatus::Broken,
            format!("File not found: {}", resolved.display()),
        ),
        Err(e) => Outcome::new(
            ValidationStatus::Error,
            format!("Path error: {}", truncate_detail(&e.to_string())),
        ),
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::core::types::{LinkCategory, Locator};
    use std::fs;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    fn internal_link(target: &str, document: &Path) -> Link {
        Link::builder()
            .target(target)
            .document(document)
            .locator(Locator::Line(3))
            .category(LinkCategory::Internal)
            .build()
            .expect("valid link")
    }

    #[test]
    fn test_resolve_target_path__relative_to_document() -> TestResult {
        let resolved =
            resolve_target_path("../missing.md", Path::new("docs/a/b.md"), Path::new("docs"))?;

        assert_eq!(resolved, PathBuf::from("docs/missing.md"));
        Ok(())
    }

    #[test]
    fn test_resolve_target_path__root_relative() -> TestResult {
        let resolved =
            resolve_target_path("/images/logo.png", Path::new("docs/a/b.md"), Path::new("docs"))?;

        assert_eq!(resolved, PathBuf::from("docs/images/logo.png"));
        Ok(())
    }

    #[test]
    fn test_resolve_target_path__strips_query_and_fragment() -> TestResult {
        let document = Path::new("site/index.html");
        let root = Path::new("site");

        assert_eq!(
            resolve_target_path("guide.md#setup", document, root)?,
            PathBuf::from("site/guide.md")
        );
        assert_eq!(
            resolve_target_path("./data.csv?raw=1", document, root)?,
            PathBuf::from("site/data.csv")
        );
        Ok(())
    }

    #[test]
    fn test_resolve_target_path__decodes_and_normalizes_separators() -> TestResult {
        let resolved = resolve_target_path(
            "My%20Notes\\day%201.md",
            Path::new("root/README.md"),
            Path::new("root"),
        )?;

        assert_eq!(resolved, PathBuf::from("root/My Notes/day 1.md"));
        Ok(())
    }

    #[test]
    fn test_resolve_target_path__invalid_encoding() {
        let result = resolve_target_path("bad%FF.md", Path::new("a.md"), Path::new("."));
        assert!(matches!(result, Err(DocLinksError::Parse(_))));
    }

    #[test]
    fn test_normalize__keeps_leading_parent_dirs() {
        assert_eq!(normalize(Path::new("../../a/./b/../c")), PathBuf::from("../../a/c"));
        assert_eq!(normalize(Path::new("/../etc")), PathBuf::from("/etc"));
    }

    #[test]
    fn test_validate_internal__existing_file() -> TestResult {
        let temp_dir = tempfile::tempdir()?;
        let base = temp_dir.path();
        fs::create_dir_all(base.join("docs/a"))?;
        fs::write(base.join("docs/setup.md"), "# Setup")?;
        let doc = base.join("docs/a/b.md");

        let outcome = validate_internal(&internal_link("../setup.md", &doc), base);
        assert_eq!(outcome.status, ValidationStatus::Ok);
        assert_eq!(outcome.message, "File exists");

        // Directories count as existing targets
        let outcome = validate_internal(&internal_link("../", &doc), base);
        assert_eq!(outcome.status, ValidationStatus::Ok);
        Ok(())
    }

    #[test]
    fn test_validate_internal__missing_file_is_broken() -> TestResult {
        let temp_dir = tempfile::tempdir()?;
        let base = temp_dir.path();
        fs::create_dir_all(base.join("docs/a"))?;
        let doc = base.join("docs/a/b.md");

        let outcome = validate_internal(&internal_link("../missing.md", &doc), &base.join("docs"));

        assert_eq!(outcome.status, ValidationStatus::Broken);
        assert_eq!(
            outcome.message,
            format!("File not found: {}", base.join("docs/missing.md").display())
        );
        Ok(())
    }

    #[test]
    fn test_validate_internal__bad_encoding_is_error() {
        let outcome = validate_internal(
            &internal_link("bad%FF.md", Path::new("a.md")),
            Path::new("."),
        );

        assert_eq!(outcome.status, ValidationStatus::Error);
        assert!(outcome.message.starts_with("Path error: "));
        assert!(outcome.message.len() <= "Path error: ".len() + 50);
    }
}
