//! Anchor resolution against headings, `{#id}` markers and `id` attributes.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::constants::defaults;
use crate::core::types::{Link, Outcome, ValidationStatus};
use crate::discovery::extractors::{DocumentFormat, notebook_markdown};
use crate::validation::internal::resolve_target_path;
use crate::validation::truncate_detail;

use std::fs;
use std::path::Path;

static HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^#{1,6}\s+(.+?)(?:\s*\{#[^}]+\})?\s*$").expect("Failed to compile heading pattern")
});

static EXPLICIT_ANCHOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{#([^}]+)\}").expect("Failed to compile anchor marker pattern"));

static ID_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bid=["']([^"']+)["']"#).expect("Failed to compile id attribute pattern")
});

static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("Failed to compile bold pattern"));

static ITALIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^*]+)\*").expect("Failed to compile italic pattern"));

static INLINE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`]+)`").expect("Failed to compile inline code pattern"));

static INLINE_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("Failed to compile inline link pattern"));

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile whitespace pattern"));

static NON_SLUG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9\-_]").expect("Failed to compile slug filter pattern"));

static HYPHENS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-+").expect("Failed to compile hyphen pattern"));

/// Turn heading text into its anchor slug.
///
/// Lowercases, unwraps bold/italic/code/link decoration, joins words with
/// hyphens and drops everything outside `[a-z0-9_-]`.
///
/// ```
/// use doclinks::validation::slugify;
///
/// assert_eq!(slugify("My **Bold** Section!"), "my-bold-section");
/// ```
pub fn slugify(text: &str) -> String {
    let slug = text.to_lowercase();
    let slug = BOLD.replace_all(&slug, "$1");
    let slug = ITALIC.replace_all(&slug, "$1");
    let slug = INLINE_CODE.replace_all(&slug, "$1");
    let slug = INLINE_LINK.replace_all(&slug, "$1");
    let slug = WHITESPACE.replace_all(&slug, "-");
    let slug = NON_SLUG.replace_all(&slug, "");
    let slug = HYPHENS.replace_all(&slug, "-");

    slug.trim_matches('-').to_string()
}

/// ATX heading texts, without a trailing `{#id}` marker.
pub fn extract_headings(content: &str) -> Vec<String> {
    HEADING
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

/// Every anchor a document defines: heading slugs first, then explicit
/// `{#id}` markers, then `id="..."` attributes.
pub fn collect_anchors(content: &str) -> Vec<String> {
    let headings = extract_headings(content).into_iter().map(|h| slugify(&h));
    let explicit = EXPLICIT_ANCHOR
        .captures_iter(content)
        .map(|caps| caps[1].to_string());
    let ids = ID_ATTRIBUTE
        .captures_iter(content)
        .map(|caps| caps[1].to_string());

    headings.chain(explicit).chain(ids).collect()
}

/// Split `file.md#section` into the document part and the fragment.
///
/// Same-document anchors (`#section`) have no document part.
pub fn split_fragment(target: &str) -> (Option<&str>, &str) {
    if target.starts_with('#') {
        return (None, target.trim_start_matches('#'));
    }
    match target.split_once('#') {
        Some((document, fragment)) => (Some(document), fragment),
        None => (Some(target), ""),
    }
}

/// Check that the fragment of `link` names an anchor in its target document.
pub fn validate_anchor(link: &Link, root: &Path) -> Outcome {
    let (document, fragment) = split_fragment(link.target());

    let content = match document {
        Some(document) => {
            let target_file = match resolve_target_path(document, link.document(), root) {
                Ok(path) => path,
                Err(e) => {
                    return Outcome::new(
                        ValidationStatus::Error,
                        format!("Path error: {}", truncate_detail(&e.to_string())),
                    );
                }
            };
            if !target_file.exists() {
                return Outcome::new(
                    ValidationStatus::Broken,
                    format!("Target file not found: {}", target_file.display()),
                );
            }
            match read_anchor_source(&target_file) {
                Ok(content) => content,
                Err(e) => {
                    return Outcome::new(
                        ValidationStatus::Error,
                        format!("Cannot read target file: {}", truncate_detail(&e)),
                    );
                }
            }
        }
        None => match read_anchor_source(link.document()) {
            Ok(content) => content,
            Err(e) => {
                return Outcome::new(
                    ValidationStatus::Error,
                    format!("Cannot read source file: {}", truncate_detail(&e)),
                );
            }
        },
    };

    find_anchor(&content, fragment)
}

/// Membership test of `fragment` in the anchors of `content`.
pub fn find_anchor(content: &str, fragment: &str) -> Outcome {
    let anchors = collect_anchors(content);
    let wanted = fragment.to_lowercase();

    if anchors.iter().any(|anchor| anchor.to_lowercase() == wanted) {
        Outcome::new(ValidationStatus::Ok, "Anchor found")
    } else {
        let available: Vec<&str> = anchors
            .iter()
            .take(defaults::ANCHOR_SUGGESTIONS)
            .map(String::as_str)
            .collect();
        Outcome::new(
            ValidationStatus::Broken,
            format!("Anchor not found. Available: {}", available.join(", ")),
        )
    }
}

/// Text searched for anchors. Notebooks contribute their markdown cells only.
fn read_anchor_source(path: &Path) -> Result<String, String> {
    let content = fs::read_to_string(path).map_err(|e| e.to_string())?;

    match DocumentFormat::from_path(path) {
        Some(DocumentFormat::Notebook) => notebook_markdown(&content).map_err(|e| e.to_string()),
        _ => Ok(content),
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::core::types::{LinkCategory, Locator};
    use std::fs;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    fn anchor_link(target: &str, document: &Path) -> Link {
        Link::builder()
            .target(target)
            .document(document)
            .locator(Locator::Line(1))
            .category(LinkCategory::Anchor)
            .build()
            .expect("valid link")
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("My **Bold** Section!"), "my-bold-section");
        assert_eq!(slugify("Getting Started"), "getting-started");
        assert_eq!(slugify("Use `cargo run` *now*"), "use-cargo-run-now");
        assert_eq!(slugify("See [the docs](https://x.io) here"), "see-the-docs-here");
        assert_eq!(slugify("  Spaces   and -- dashes  "), "spaces-and-dashes");
        assert_eq!(slugify("snake_case_name"), "snake_case_name");
        assert_eq!(slugify("1. Intro: What's New?"), "1-intro-whats-new");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify__is_idempotent() {
        for heading in ["My **Bold** Section!", "A -- B", "Día 1: Introducción"] {
            let once = slugify(heading);
            assert_eq!(slugify(&once), once);
        }
    }

    #[test]
    fn test_extract_headings() {
        let content = "# Title\n\nText\n## Setup {#install}\n####### not a heading\n#nospace\n### Last  \n";

        assert_eq!(extract_headings(content), vec!["Title", "Setup", "Last"]);
    }

    #[test]
    fn test_collect_anchors__all_sources() {
        let content = "# Intro\n## Custom {#my-id}\n<div id=\"html-id\"></div>\n<span id='other'></span>";

        assert_eq!(
            collect_anchors(content),
            vec!["intro", "custom", "my-id", "html-id", "other"]
        );
    }

    #[test]
    fn test_split_fragment() {
        assert_eq!(split_fragment("#setup"), (None, "setup"));
        assert_eq!(split_fragment("other.md#intro"), (Some("other.md"), "intro"));
        assert_eq!(split_fragment("a.md#b#c"), (Some("a.md"), "b#c"));
    }

    #[test]
    fn test_find_anchor__case_insensitive() {
        let outcome = find_anchor("# Getting Started", "Getting-Started");
        assert_eq!(outcome.status, ValidationStatus::Ok);
        assert_eq!(outcome.message, "Anchor found");
    }

    #[test]
    fn test_find_anchor__lists_at_most_five_candidates() {
        let content = "# A\n# B\n# C\n# D\n# E\n# F\n# G";
        let outcome = find_anchor(content, "missing");

        assert_eq!(outcome.status, ValidationStatus::Broken);
        assert_eq!(outcome.message, "Anchor not found. Available: a, b, c, d, e");
    }

    #[test]
    fn test_validate_anchor__same_document() -> TestResult {
        let temp_dir = tempfile::tempdir()?;
        let doc = temp_dir.path().join("guide.md");
        fs::write(&doc, "# Guide\n\n## My **Bold** Section!\n\n[jump](#my-bold-section)")?;

        let outcome = validate_anchor(&anchor_link("#my-bold-section", &doc), temp_dir.path());
        assert_eq!(outcome.status, ValidationStatus::Ok);

        let outcome = validate_anchor(&anchor_link("#nope", &doc), temp_dir.path());
        assert_eq!(outcome.status, ValidationStatus::Broken);
        assert!(outcome.message.contains("guide"));
        Ok(())
    }

    #[test]
    fn test_validate_anchor__other_document() -> TestResult {
        let temp_dir = tempfile::tempdir()?;
        let base = temp_dir.path();
        fs::write(base.join("other.md"), "# Intro\n\nWelcome")?;
        let doc = base.join("index.md");
        fs::write(&doc, "[see](other.md#intro)")?;

        let outcome = validate_anchor(&anchor_link("other.md#intro", &doc), base);
        assert_eq!(outcome.status, ValidationStatus::Ok);
        Ok(())
    }

    #[test]
    fn test_validate_anchor__missing_target_document() -> TestResult {
        let temp_dir = tempfile::tempdir()?;
        let doc = temp_dir.path().join("index.md");
        fs::write(&doc, "")?;

        let outcome = validate_anchor(&anchor_link("gone.md#intro", &doc), temp_dir.path());
        assert_eq!(outcome.status, ValidationStatus::Broken);
        assert!(outcome.message.starts_with("Target file not found: "));
        Ok(())
    }

    #[test]
    fn test_validate_anchor__unreadable_source_is_error() -> TestResult {
        let temp_dir = tempfile::tempdir()?;
        let doc = temp_dir.path().join("deleted.md");

        let outcome = validate_anchor(&anchor_link("#intro", &doc), temp_dir.path());
        assert_eq!(outcome.status, ValidationStatus::Error);
        assert!(outcome.message.starts_with("Cannot read source file: "));
        Ok(())
    }

    #[test]
    fn test_validate_anchor__notebook_uses_markdown_cells() -> TestResult {
        let temp_dir = tempfile::tempdir()?;
        let base = temp_dir.path();
        fs::write(
            base.join("lesson.ipynb"),
            r###"{"cells": [
                {"cell_type": "markdown", "source": ["## Data Loading\n", "text"]},
                {"cell_type": "code", "source": "# Not A Heading"}
            ]}"###,
        )?;
        let doc = base.join("README.md");
        fs::write(&doc, "")?;

        let found = validate_anchor(&anchor_link("lesson.ipynb#data-loading", &doc), base);
        assert_eq!(found.status, ValidationStatus::Ok);

        let code_comment = validate_anchor(&anchor_link("lesson.ipynb#not-a-heading", &doc), base);
        assert_eq!(code_comment.status, ValidationStatus::Broken);
        Ok(())
    }
}
