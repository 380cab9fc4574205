use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

pub struct ProgressReporter {
    multi_progress: Arc<MultiProgress>,
    scan_spinner: Option<ProgressBar>,
    link_progress: Option<ProgressBar>,
    enabled: bool,
}

impl ProgressReporter {
    pub fn new(enabled: bool) -> Self {
        Self {
            multi_progress: Arc::new(MultiProgress::new()),
            scan_spinner: None,
            link_progress: None,
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn start_scan(&mut self, root: &str) {
        if !self.enabled {
            return;
        }

        let pb = self.multi_progress.add(ProgressBar::new_spinner());
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Scanning {root}"));
        pb.enable_steady_tick(Duration::from_millis(120));
        self.scan_spinner = Some(pb);
    }

    pub fn finish_scan(&self, files: usize, links: usize) {
        if let Some(ref pb) = self.scan_spinner {
            pb.finish_with_message(format!("✓ Found {links} link(s) in {files} file(s)"));
        }
    }

    pub fn start_link_validation(&mut self, total_links: usize) {
        if !self.enabled {
            return;
        }

        let pb = self
            .multi_progress
            .add(ProgressBar::new(total_links as u64));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.yellow/red}] {pos}/{len} links validated ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message("Validating links");
        pb.enable_steady_tick(Duration::from_millis(120));
        self.link_progress = Some(pb);
    }

    pub fn update_link_progress(&self, current: usize) {
        if let Some(ref pb) = self.link_progress {
            pb.set_position(current as u64);
        }
    }

    pub fn finish_link_validation(&self, issue_count: usize, total_count: usize) {
        if let Some(ref pb) = self.link_progress {
            let message = if issue_count == 0 {
                "✓ All links validated successfully".to_string()
            } else {
                format!("✓ Validation complete ({issue_count}/{total_count} with issues)")
            };
            pb.finish_with_message(message);
        }
    }

    pub fn finish_and_clear(&self) {
        if self.enabled {
            self.multi_progress.clear().unwrap_or(());
        }
    }

    pub fn log_warning(&self, message: &str) {
        if self.enabled {
            self.multi_progress
                .println(format!("⚠ {message}"))
                .unwrap_or(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_reporter_is_inert() {
        let mut reporter = ProgressReporter::new(false);
        reporter.start_scan("docs");
        reporter.finish_scan(1, 2);
        reporter.start_link_validation(10);
        reporter.update_link_progress(5);
        reporter.finish_link_validation(0, 10);
        reporter.log_warning("ignored");
        reporter.finish_and_clear();

        assert!(!reporter.is_enabled());
        assert!(reporter.link_progress.is_none());
        assert!(reporter.scan_spinner.is_none());
    }

    #[test]
    fn test_enabled_reporter_tracks_position() {
        let mut reporter = ProgressReporter::new(true);
        reporter.start_link_validation(10);
        reporter.update_link_progress(7);

        let position = reporter.link_progress.as_ref().map(|pb| pb.position());
        assert_eq!(position, Some(7));

        reporter.finish_link_validation(2, 10);
        reporter.finish_and_clear();
    }
}
