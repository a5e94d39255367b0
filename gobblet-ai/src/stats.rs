//! Search statistics tracking.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Statistics collected during one search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Nodes visited, one per recursive entry (root included)
    pub nodes: u64,

    /// Sibling lists cut short by alpha-beta
    pub cutoffs: u64,

    /// Deepest search depth that ran to completion
    pub depth_completed: u32,

    /// Time budget ran out before the search finished
    pub aborted: bool,

    /// Wall-clock time spent
    pub elapsed: Duration,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in the counters of a deeper iteration.
    pub fn merge(&mut self, other: &SearchStats) {
        self.nodes += other.nodes;
        self.cutoffs += other.cutoffs;
    }

    /// Get nodes per second
    pub fn nodes_per_sec(&self) -> f64 {
        let elapsed = self.elapsed.as_secs_f64();
        if elapsed > 0.0 {
            self.nodes as f64 / elapsed
        } else {
            0.0
        }
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        let mut line = format!(
            "nodes={} cutoffs={} depth={} time={}ms rate={:.0}/s",
            self.nodes,
            self.cutoffs,
            self.depth_completed,
            self.elapsed.as_millis(),
            self.nodes_per_sec(),
        );
        if self.aborted {
            line.push_str(" (out of time)");
        }
        line
    }

    /// Emit the summary as a debug event.
    pub fn log(&self) {
        debug!(
            nodes = self.nodes,
            cutoffs = self.cutoffs,
            depth = self.depth_completed,
            aborted = self.aborted,
            elapsed_ms = self.elapsed.as_millis() as u64,
            "search finished"
        );
    }
}
