//! Short rolling board history used for draw-by-repetition.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::Board;

/// Number of snapshots kept.
pub const HISTORY_WINDOW: usize = 6;

/// The last [`HISTORY_WINDOW`] board snapshots, oldest first.
///
/// The game records a snapshot after each move by the second player. The
/// position counts as repeated when the window alternates between exactly two
/// boards: `s0 == s2 == s4` and `s1 == s3 == s5`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardHistory {
    snapshots: VecDeque<Board>,
}

impl BoardHistory {
    pub fn new() -> BoardHistory {
        BoardHistory::default()
    }

    /// Append a snapshot, dropping the oldest once the window is full.
    pub fn record(&mut self, board: &Board) {
        if self.snapshots.len() == HISTORY_WINDOW {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(board.clone());
    }

    /// Check the two-position cycle over a full window.
    pub fn is_repeating(&self) -> bool {
        if self.snapshots.len() < HISTORY_WINDOW {
            return false;
        }
        let s = &self.snapshots;
        s[0] == s[2] && s[2] == s[4] && s[1] == s[3] && s[3] == s[5]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}
