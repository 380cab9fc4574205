use serde::Serialize;

use crate::core::types::{LinkCategory, ValidationResult, ValidationStatus};

use std::collections::BTreeMap;

/// Counts over a finished run. Only non-zero buckets are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub by_status: BTreeMap<ValidationStatus, usize>,
    pub by_category: BTreeMap<LinkCategory, usize>,
}

impl Summary {
    pub fn from_results(results: &[ValidationResult]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Default::default()
        };

        for result in results {
            *summary.by_status.entry(result.status()).or_default() += 1;
            *summary
                .by_category
                .entry(result.link().category())
                .or_default() += 1;
        }

        summary
    }

    pub fn count(&self, status: ValidationStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    /// Broken, placeholder, timeout and error results.
    pub fn issue_count(&self) -> usize {
        self.by_status
            .iter()
            .filter(|(status, _)| status.is_issue())
            .map(|(_, count)| count)
            .sum()
    }

    pub fn has_failures(&self) -> bool {
        self.by_status.keys().any(|status| status.is_failure())
    }
}

/// Results a maintainer has to look at, in input order.
pub fn issues(results: &[ValidationResult]) -> Vec<&ValidationResult> {
    results.iter().filter(|r| r.is_issue()).collect()
}

/// Process exit code: 1 if anything is broken, a placeholder or an error.
///
/// Timeouts alone do not fail a run.
pub fn exit_code(results: &[ValidationResult]) -> i32 {
    if Summary::from_results(results).has_failures() {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::core::types::{Link, Locator, Outcome};

    fn result(target: &str, category: LinkCategory, status: ValidationStatus) -> ValidationResult {
        let link = Link::builder()
            .target(target)
            .document("README.md")
            .locator(Locator::Line(1))
            .category(category)
            .build()
            .expect("valid link");
        Outcome::new(status, "message").bind(&link)
    }

    #[test]
    fn test_summary__counts_non_zero_buckets() {
        let results = vec![
            result("https://a.com", LinkCategory::External, ValidationStatus::Ok),
            result("https://b.com", LinkCategory::External, ValidationStatus::Broken),
            result("b.md", LinkCategory::Internal, ValidationStatus::Ok),
            result("#", LinkCategory::Placeholder, ValidationStatus::Placeholder),
            result("https://slow.com", LinkCategory::External, ValidationStatus::Timeout),
        ];

        let summary = Summary::from_results(&results);

        assert_eq!(summary.total, 5);
        assert_eq!(summary.count(ValidationStatus::Ok), 2);
        assert_eq!(summary.count(ValidationStatus::Skipped), 0);
        assert!(!summary.by_status.contains_key(&ValidationStatus::Skipped));
        assert_eq!(summary.by_category[&LinkCategory::External], 3);
        assert!(!summary.by_category.contains_key(&LinkCategory::Anchor));
        assert_eq!(summary.issue_count(), 3);
        assert!(summary.has_failures());
    }

    #[test]
    fn test_summary__serializes_labels() -> Result<(), serde_json::Error> {
        let results = vec![result("b.md", LinkCategory::Internal, ValidationStatus::Ok)];
        let json = serde_json::to_value(Summary::from_results(&results))?;

        assert_eq!(json["total"], 1);
        assert_eq!(json["by_status"]["ok"], 1);
        assert_eq!(json["by_category"]["internal"], 1);
        Ok(())
    }

    #[test]
    fn test_issues__keeps_order() {
        let results = vec![
            result("x", LinkCategory::Internal, ValidationStatus::Broken),
            result("y", LinkCategory::Internal, ValidationStatus::Ok),
            result("z", LinkCategory::External, ValidationStatus::Error),
        ];

        let targets: Vec<&str> = issues(&results).iter().map(|r| r.link().target()).collect();
        assert_eq!(targets, vec!["x", "z"]);
    }

    #[test]
    fn test_exit_code() {
        let clean = vec![
            result("a", LinkCategory::Internal, ValidationStatus::Ok),
            result("b", LinkCategory::Unknown, ValidationStatus::Skipped),
            result("c", LinkCategory::External, ValidationStatus::Redirect),
            result("d", LinkCategory::External, ValidationStatus::Timeout),
        ];
        assert_eq!(exit_code(&clean), 0);
        assert_eq!(exit_code(&[]), 0);

        for failing in [
            ValidationStatus::Broken,
            ValidationStatus::Placeholder,
            ValidationStatus::Error,
        ] {
            let mut results = clean.clone();
            results.push(result("e", LinkCategory::External, failing));
            assert_eq!(exit_code(&results), 1, "{failing} should fail the run");
        }
    }
}
