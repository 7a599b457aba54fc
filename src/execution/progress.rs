//! Progress reporting for a single `apply` run.

use std::path::PathBuf;
use std::time::Instant;

/// A progress update event.
#[derive(Debug, Clone)]
pub enum ProgressUpdate {
    /// Processing has started.
    Started {
        /// Filter being applied.
        filter: String,
        /// Number of stages that will run.
        total_stages: usize,
    },
    /// A stage has started.
    StageStarted {
        /// Stage name.
        stage: String,
        /// Zero-based stage index.
        index: usize,
        /// Number of stages.
        total: usize,
    },
    /// A stage has completed.
    StageCompleted {
        /// Stage name.
        stage: String,
        /// Wall time of the stage.
        duration_ms: u64,
        /// Zero-based stage index.
        index: usize,
        /// Number of stages.
        total: usize,
    },
    /// The output file has been written.
    Completed {
        /// Path written.
        output: PathBuf,
        /// Wall time of the whole run.
        total_duration_ms: u64,
    },
}

/// Callback type for progress updates.
pub type ProgressCallback = Box<dyn Fn(ProgressUpdate) + Send + Sync>;

/// Tracks stage timings and forwards them to an optional callback.
pub struct ProgressTracker<'a> {
    total_stages: usize,
    start_time: Instant,
    stage_start: Instant,
    callback: Option<&'a ProgressCallback>,
}

impl<'a> ProgressTracker<'a> {
    /// Create a tracker and emit `Started`.
    pub fn start(filter: &str, total_stages: usize, callback: Option<&'a ProgressCallback>) -> Self {
        let tracker = Self {
            total_stages,
            start_time: Instant::now(),
            stage_start: Instant::now(),
            callback,
        };
        tracker.send(ProgressUpdate::Started {
            filter: filter.to_string(),
            total_stages,
        });
        tracker
    }

    /// Report that a stage has started.
    pub fn stage_started(&mut self, index: usize, stage: &str) {
        self.stage_start = Instant::now();
        self.send(ProgressUpdate::StageStarted {
            stage: stage.to_string(),
            index,
            total: self.total_stages,
        });
    }

    /// Report that a stage has completed; returns its duration.
    pub fn stage_completed(&mut self, index: usize, stage: &str) -> u64 {
        let duration_ms = self.stage_start.elapsed().as_millis() as u64;
        self.send(ProgressUpdate::StageCompleted {
            stage: stage.to_string(),
            duration_ms,
            index,
            total: self.total_stages,
        });
        duration_ms
    }

    /// Report completion; returns total elapsed milliseconds.
    pub fn completed(&self, output: PathBuf) -> u64 {
        let total_duration_ms = self.start_time.elapsed().as_millis() as u64;
        self.send(ProgressUpdate::Completed {
            output,
            total_duration_ms,
        });
        total_duration_ms
    }

    fn send(&self, update: ProgressUpdate) {
        if let Some(callback) = self.callback {
            callback(update);
        }
    }
}
