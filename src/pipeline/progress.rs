// file: src/pipeline/progress.rs
// description: progress bars and run counters for conversion and generation batches
// reference: uses indicatif for progress bars and tracks processing metrics

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Counters for one finished (or running) batch.
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    pub files_processed: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    pub questions_generated: usize,
    pub duration_secs: u64,
}

impl PipelineStats {
    pub fn total_files(&self) -> usize {
        self.files_processed + self.files_skipped + self.files_failed
    }

    pub fn files_per_second(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        self.total_files() as f64 / self.duration_secs as f64
    }

    /// Share of files that did not fail. Skipped files count as handled.
    pub fn success_rate(&self) -> f64 {
        let total = self.total_files();
        if total == 0 {
            return 0.0;
        }
        ((self.files_processed + self.files_skipped) as f64 / total as f64) * 100.0
    }
}

/// One bar for files, one status line underneath. Shared by reference
/// across the concurrent tasks of a batch.
pub struct ProgressTracker {
    files_bar: ProgressBar,
    status_line: ProgressBar,
    processed: AtomicUsize,
    skipped: AtomicUsize,
    failed: AtomicUsize,
    questions: AtomicUsize,
    started: Instant,
}

impl ProgressTracker {
    pub fn new(total_files: usize) -> Self {
        Self::build(MultiProgress::new(), total_files)
    }

    /// Tracker that counts but never draws.
    pub fn hidden(total_files: usize) -> Self {
        Self::build(
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
            total_files,
        )
    }

    fn build(bars: MultiProgress, total_files: usize) -> Self {
        Self {
            files_bar: files_bar(&bars, total_files as u64),
            status_line: status_line(&bars),
            processed: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            questions: AtomicUsize::new(0),
            started: Instant::now(),
        }
    }

    pub fn record_processed(&self) {
        self.bump(&self.processed);
    }

    pub fn record_skipped(&self) {
        self.bump(&self.skipped);
    }

    pub fn record_failed(&self) {
        self.bump(&self.failed);
    }

    pub fn add_questions(&self, count: usize) {
        self.questions.fetch_add(count, Ordering::Relaxed);
    }

    pub fn finish(&self) {
        self.files_bar.finish_with_message("done");
        self.status_line.finish_and_clear();
    }

    pub fn snapshot(&self) -> PipelineStats {
        PipelineStats {
            files_processed: self.processed.load(Ordering::Relaxed),
            files_skipped: self.skipped.load(Ordering::Relaxed),
            files_failed: self.failed.load(Ordering::Relaxed),
            questions_generated: self.questions.load(Ordering::Relaxed),
            duration_secs: self.started.elapsed().as_secs(),
        }
    }

    fn bump(&self, counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
        self.files_bar.inc(1);

        let stats = self.snapshot();
        self.status_line.set_message(format!(
            "Done: {} | Questions: {} | Skipped: {} | Failed: {}",
            stats.files_processed, stats.questions_generated, stats.files_skipped, stats.files_failed
        ));
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn files_bar(bars: &MultiProgress, total: u64) -> ProgressBar {
    let bar = bars.add(ProgressBar::new(total));
    match ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
    {
        Ok(style) => bar.set_style(style.progress_chars("█▓▒░")),
        Err(err) => tracing::warn!("Progress bar template rejected: {}", err),
    }
    bar
}

fn status_line(bars: &MultiProgress) -> ProgressBar {
    let bar = bars.add(ProgressBar::new(0));
    match ProgressStyle::default_bar().template("{msg}") {
        Ok(style) => bar.set_style(style),
        Err(err) => tracing::warn!("Status line template rejected: {}", err),
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_stats_rates() {
        let stats = PipelineStats {
            files_processed: 90,
            files_skipped: 10,
            files_failed: 10,
            questions_generated: 0,
            duration_secs: 11,
        };

        assert_eq!(stats.total_files(), 110);
        assert_eq!(stats.files_per_second(), 10.0);
        assert!((stats.success_rate() - 90.909).abs() < 0.01);
    }

    #[test]
    fn test_pipeline_stats_empty_run() {
        let stats = PipelineStats::default();
        assert_eq!(stats.files_per_second(), 0.0);
        assert_eq!(stats.success_rate(), 0.0);
    }

    #[test]
    fn test_tracker_counts_outcomes() {
        let tracker = ProgressTracker::hidden(4);

        tracker.record_processed();
        tracker.add_questions(5);
        tracker.record_skipped();
        tracker.record_failed();
        tracker.record_failed();

        let stats = tracker.snapshot();
        assert_eq!(stats.files_processed, 1);
        assert_eq!(stats.files_skipped, 1);
        assert_eq!(stats.files_failed, 2);
        assert_eq!(stats.questions_generated, 5);
        assert_eq!(stats.total_files(), 4);
    }
}
