use kinotop_models::MovieRecord;
use std::collections::HashMap;
use tracing::{info, warn};

/// Receives pipeline progress, e.g. to drive a terminal progress bar
pub trait ProgressObserver: Send + Sync {
    fn stage(&self, _message: &str) {}
    fn links_collected(&self, _count: usize) {}
    fn movie_extracted(&self, _current: usize, _total: usize, _record: &MovieRecord) {}
}

/// Observer that ignores everything
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// Progress tracker for operations that process multiple items
/// Provides periodic progress updates and final summaries to reduce log noise
pub struct ProgressTracker {
    total: usize,
    extracted: usize,
    failed: usize,
    start_time: std::time::Instant,
    progress_interval: usize, // Log every N items
    last_progress_log: usize,
    error_counts: HashMap<String, usize>,
}

impl ProgressTracker {
    /// Create a new progress tracker
    ///
    /// # Arguments
    /// * `total` - Total number of items to process
    /// * `progress_interval` - Log progress every N items
    pub fn new(total: usize, progress_interval: usize) -> Self {
        if total > 10 || progress_interval < total {
            info!("Starting operation: {} items to process", total);
        }
        Self {
            total,
            extracted: 0,
            failed: 0,
            start_time: std::time::Instant::now(),
            progress_interval: progress_interval.max(1),
            last_progress_log: 0,
            error_counts: HashMap::new(),
        }
    }

    /// Pick a log interval that gives roughly ten progress lines
    pub fn interval_for(total: usize) -> usize {
        if total < 100 { 10 } else { total / 10 }
    }

    pub fn record_extracted(&mut self) {
        self.extracted += 1;
    }

    /// Record a failure under a category so the summary can group them
    pub fn record_failed_with_error(&mut self, error_category: &str) {
        self.failed += 1;
        *self.error_counts.entry(error_category.to_string()).or_insert(0) += 1;
    }

    pub fn extracted(&self) -> usize {
        self.extracted
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Log progress if interval has been reached
    ///
    /// # Arguments
    /// * `current` - Current item index (1-based)
    pub fn log_progress(&mut self, current: usize) {
        if current - self.last_progress_log >= self.progress_interval || current == self.total {
            let elapsed = self.start_time.elapsed().as_secs_f64();
            let rate = if elapsed > 0.0 { current as f64 / elapsed } else { 0.0 };

            info!(
                "Progress: {}/{} ({:.2} items/sec) | Extracted: {} | Failed: {}",
                current, self.total, rate, self.extracted, self.failed
            );
            self.last_progress_log = current;
        }
    }

    /// Log final summary of the operation
    pub fn log_summary(&self, operation_name: &str) {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if self.failed > 0 {
            warn!(
                "{} stopped: {} of {} in {:.1}s | Extracted: {} | Failed: {}",
                operation_name, self.extracted + self.failed, self.total, elapsed,
                self.extracted, self.failed
            );

            let mut error_entries: Vec<_> = self.error_counts.iter().collect();
            error_entries.sort_by(|a, b| b.1.cmp(a.1));
            let error_summary: Vec<String> = error_entries
                .iter()
                .map(|(category, count)| format!("{}: {}", category, count))
                .collect();
            info!("Error breakdown: {}", error_summary.join(", "));
        } else {
            info!(
                "{} completed: {} total in {:.1}s | Extracted: {}",
                operation_name, self.total, elapsed, self.extracted
            );
        }
    }
}
