use async_trait::async_trait;
use futures::{StreamExt, stream};
use log::{debug, info};
use regex::Regex;
use rustc_hash::FxHashMap;
use tokio::sync::OnceCell;

use crate::config::Config;
use crate::core::error::Result;
use crate::core::types::{Link, LinkCategory, Outcome, ValidationResult, ValidationStatus};
use crate::discovery::categorizer::should_skip;
use crate::discovery::extractors::DocumentFormat;
use crate::ui::progress::ProgressReporter;
use crate::validation::anchor::{split_fragment, validate_anchor};
use crate::validation::external::ExternalChecker;
use crate::validation::internal::{resolve_target_path, validate_internal};

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Cache identity. Relative targets carry the directory or document they are
/// resolved from so the same string in two places does not share an outcome.
type CacheKey = (LinkCategory, String);

#[async_trait]
pub trait ValidateLinks {
    /// Validate every link, at most `concurrency` at a time. Results come back
    /// in the same order as `links`.
    async fn validate_links(
        &self,
        links: &[Link],
        progress: Option<&ProgressReporter>,
    ) -> Vec<ValidationResult>;
}

#[derive(Debug)]
pub struct Validator {
    root: PathBuf,
    external: ExternalChecker,
    skip_external: bool,
    check_fragments: bool,
    exclude_patterns: Vec<Regex>,
    concurrency: usize,
    cache: Mutex<FxHashMap<CacheKey, Arc<OnceCell<Outcome>>>>,
}

impl Validator {
    /// A validator for links found under `root`.
    pub fn new<P: Into<PathBuf>>(root: P, config: &Config) -> Result<Self> {
        Ok(Self {
            root: root.into(),
            external: ExternalChecker::new(config)?,
            skip_external: config.skip_external(),
            check_fragments: config.check_fragments(),
            exclude_patterns: config.compile_exclude_patterns()?,
            concurrency: config.concurrency(),
            cache: Mutex::new(FxHashMap::default()),
        })
    }

    /// Validate one link.
    ///
    /// The first caller for a cache key runs the check; concurrent callers
    /// with the same key wait for it and every later caller reuses it. The
    /// returned result is always bound to `link`.
    pub async fn validate(&self, link: &Link) -> ValidationResult {
        let cell = self.cache_cell(self.cache_key(link));
        let outcome = cell.get_or_init(|| self.dispatch(link)).await;
        outcome.bind(link)
    }

    /// Number of distinct outcomes computed so far.
    pub fn cached_count(&self) -> usize {
        self.lock_cache().len()
    }

    fn cache_cell(&self, key: CacheKey) -> Arc<OnceCell<Outcome>> {
        Arc::clone(self.lock_cache().entry(key).or_default())
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, FxHashMap<CacheKey, Arc<OnceCell<Outcome>>>> {
        match self.cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn cache_key(&self, link: &Link) -> CacheKey {
        let target = link.target();
        let scope = match link.category() {
            LinkCategory::Anchor if target.starts_with('#') => Some(link.document()),
            LinkCategory::Anchor | LinkCategory::Internal if !target.starts_with('/') => {
                link.document().parent()
            }
            _ => None,
        };

        let identity = match scope {
            Some(scope) => format!("{}|{target}", scope.display()),
            None => target.to_string(),
        };
        (link.category(), identity)
    }

    async fn dispatch(&self, link: &Link) -> Outcome {
        let target = link.target();

        let outcome = if should_skip(target) {
            Outcome::new(ValidationStatus::Skipped, "Skipped (special protocol)")
        } else if self.exclude_patterns.iter().any(|re| re.is_match(target)) {
            Outcome::new(ValidationStatus::Skipped, "Excluded by pattern")
        } else {
            match link.category() {
                LinkCategory::Placeholder => Outcome::new(
                    ValidationStatus::Placeholder,
                    "Placeholder URL needs to be updated",
                ),
                LinkCategory::External | LinkCategory::Colab => {
                    if self.skip_external {
                        Outcome::new(ValidationStatus::Skipped, "External validation skipped")
                    } else {
                        self.external.check(target).await
                    }
                }
                LinkCategory::Internal => self.check_internal(link),
                LinkCategory::Anchor => validate_anchor(link, &self.root),
                LinkCategory::Unknown => {
                    Outcome::new(ValidationStatus::Skipped, "Unknown link category")
                }
            }
        };

        debug!(
            "[{}] {} ({}:{}) {}",
            outcome.status,
            target,
            link.document().display(),
            link.locator(),
            outcome.message
        );
        outcome
    }

    /// Existence check, plus the fragment when enabled and the target is a
    /// document that defines anchors.
    fn check_internal(&self, link: &Link) -> Outcome {
        let outcome = validate_internal(link, &self.root);
        if !self.check_fragments || outcome.status != ValidationStatus::Ok {
            return outcome;
        }

        let (Some(document), fragment) = split_fragment(link.target()) else {
            return outcome;
        };
        if fragment.is_empty() || !has_anchors(document, link.document(), &self.root) {
            return outcome;
        }

        match validate_anchor(link, &self.root) {
            anchored if anchored.status == ValidationStatus::Ok => outcome,
            anchored => anchored,
        }
    }
}

impl Validator {
    async fn validate_tracked(
        &self,
        link: &Link,
        completed: &AtomicUsize,
        progress: Option<&ProgressReporter>,
    ) -> ValidationResult {
        let result = self.validate(link).await;
        let current = completed.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(progress) = progress {
            progress.update_link_progress(current);
        }
        result
    }
}

/// Markdown, notebooks and web pages define anchors. Typeset documents do not.
fn has_anchors(target: &str, document: &Path, root: &Path) -> bool {
    resolve_target_path(target, document, root)
        .ok()
        .and_then(|path| DocumentFormat::from_path(&path))
        .is_some_and(|format| format != DocumentFormat::Latex)
}

#[async_trait]
impl ValidateLinks for Validator {
    async fn validate_links(
        &self,
        links: &[Link],
        progress: Option<&ProgressReporter>,
    ) -> Vec<ValidationResult> {
        let completed = AtomicUsize::new(0);

        let pending: Vec<_> = links
            .iter()
            .map(|link| self.validate_tracked(link, &completed, progress))
            .collect();
        let results: Vec<ValidationResult> = stream::iter(pending)
            .buffered(self.concurrency)
            .collect()
            .await;

        info!(
            "Validated {} link(s), {} distinct check(s), {} issue(s)",
            results.len(),
            self.cached_count(),
            results.iter().filter(|r| r.is_issue()).count()
        );

        results
    }
}
