//! In-memory activity history
//!
//! Finished runs are kept most-recent-first for the lifetime of the process.
//! Nothing is written to disk.

use tracing::info;

use crate::format::format_distance;
use crate::run::{ActivityRow, RunSummary};

#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    runs: Vec<RunSummary>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a finished run
    pub fn record(&mut self, run: RunSummary) {
        info!(
            "Recording activity {} ({})",
            run.id,
            format_distance(run.distance_meters)
        );
        self.runs.insert(0, run);
    }

    /// Most recent run, used for last-run comparisons
    pub fn latest(&self) -> Option<&RunSummary> {
        self.runs.first()
    }

    pub fn get(&self, id: &str) -> Option<&RunSummary> {
        self.runs.iter().find(|run| run.id == id)
    }

    pub fn list(&self) -> &[RunSummary] {
        &self.runs
    }

    pub fn rows(&self) -> Vec<ActivityRow> {
        self.runs.iter().map(RunSummary::formatted).collect()
    }

    pub fn total_distance_meters(&self) -> f64 {
        self.runs.iter().map(|run| run.distance_meters).sum()
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}
