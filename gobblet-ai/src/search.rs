//! Depth-limited game-tree search: plain minimax, minimax with alpha-beta
//! pruning, and iterative deepening under a wall-clock budget.
//!
//! Every variant scores leaves with [`evaluate`] from the AI player's point of
//! view: the AI maximizes, its opponent minimizes. Successors are visited in
//! generation order and only a strictly better score replaces the current
//! best, so ties keep the earliest move.

use std::time::{Duration, Instant};

use gobblet_core::{successors, GameState, Move, Player};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::eval::{evaluate, EvalWeights};
use crate::stats::SearchStats;

/// Score bound. Returned, with the sign of the side that was searching, when
/// the time budget runs out.
pub const INF: i32 = i32::MAX;

/// What a search hands back to the game loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Backed-up score from the AI player's point of view
    pub score: i32,
    /// None at a leaf, on a position without moves, or after a timeout
    pub best_move: Option<Move>,
    pub stats: SearchStats,
}

impl SearchResult {
    #[inline]
    pub fn nodes(&self) -> u64 {
        self.stats.nodes
    }

    /// True if the time budget ran out and the score is the abort sentinel.
    #[inline]
    pub fn aborted(&self) -> bool {
        self.stats.aborted
    }
}

/// One search run: fixed AI player, weights and optional deadline.
struct Searcher<'a> {
    ai_player: Player,
    weights: &'a EvalWeights,
    deadline: Option<Instant>,
    stats: SearchStats,
}

impl<'a> Searcher<'a> {
    fn new(ai_player: Player, weights: &'a EvalWeights, deadline: Option<Instant>) -> Self {
        Self {
            ai_player,
            weights,
            deadline,
            stats: SearchStats::new(),
        }
    }

    #[inline]
    fn leaf(&self, state: &GameState) -> (i32, Option<Move>) {
        (evaluate(state, self.ai_player, self.weights), None)
    }

    #[inline]
    fn out_of_time(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    fn minimax(&mut self, state: &GameState, depth: u32, maximizing: bool) -> (i32, Option<Move>) {
        self.stats.nodes += 1;
        if depth == 0 || state.is_game_over() {
            return self.leaf(state);
        }
        let children = successors(state);
        if children.is_empty() {
            return self.leaf(state);
        }

        let mut best = if maximizing { -INF } else { INF };
        let mut best_move = None;
        for (mov, child) in children {
            let (score, _) = self.minimax(&child, depth - 1, !maximizing);
            let better = if maximizing { score > best } else { score < best };
            if better {
                best = score;
                best_move = Some(mov);
            }
        }
        (best, best_move)
    }

    fn alpha_beta(
        &mut self,
        state: &GameState,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> (i32, Option<Move>) {
        self.stats.nodes += 1;
        let sentinel = if maximizing { -INF } else { INF };
        if self.out_of_time() {
            self.stats.aborted = true;
            return (sentinel, None);
        }
        if depth == 0 || state.is_game_over() {
            return self.leaf(state);
        }
        let children = successors(state);
        if children.is_empty() {
            return self.leaf(state);
        }

        let mut best = sentinel;
        let mut best_move = None;
        for (mov, child) in children {
            let (score, _) = self.alpha_beta(&child, depth - 1, alpha, beta, !maximizing);
            if self.stats.aborted {
                return (sentinel, None);
            }

            if maximizing {
                if score > best {
                    best = score;
                    best_move = Some(mov);
                }
                alpha = alpha.max(best);
            } else {
                if score < best {
                    best = score;
                    best_move = Some(mov);
                }
                beta = beta.min(best);
            }
            if beta <= alpha {
                self.stats.cutoffs += 1;
                break;
            }
        }
        (best, best_move)
    }

    fn finish(
        mut self,
        depth: u32,
        (score, best_move): (i32, Option<Move>),
        start: Instant,
    ) -> SearchResult {
        if !self.stats.aborted {
            self.stats.depth_completed = depth;
        }
        self.stats.elapsed = start.elapsed();
        SearchResult {
            score,
            best_move,
            stats: self.stats,
        }
    }
}

/// Plain minimax to `depth` plies for the side to move, scored for `ai_player`.
///
/// The root maximizes when `ai_player` is to move. Depth 0 or a finished game
/// return the static evaluation and no move.
pub fn minimax(
    state: &GameState,
    depth: u32,
    ai_player: Player,
    weights: &EvalWeights,
) -> SearchResult {
    let start = Instant::now();
    let mut searcher = Searcher::new(ai_player, weights, None);
    let outcome = searcher.minimax(state, depth, state.turn() == ai_player);
    searcher.finish(depth, outcome, start)
}

/// Minimax with alpha-beta pruning.
///
/// Like [`minimax`], the caller passes no maximizing flag: the root maximizes
/// when `ai_player` is to move, and the window starts at `(-INF, INF)`.
/// Returns the same score as [`minimax`] at the same depth. With a `deadline`
/// the clock is checked at every node; once it passes, the search unwinds
/// and the result carries the `±INF` sentinel, no move, and
/// [`SearchResult::aborted`] set.
pub fn alpha_beta(
    state: &GameState,
    depth: u32,
    ai_player: Player,
    weights: &EvalWeights,
    deadline: Option<Instant>,
) -> SearchResult {
    let start = Instant::now();
    let mut searcher = Searcher::new(ai_player, weights, deadline);
    let outcome = searcher.alpha_beta(state, depth, -INF, INF, state.turn() == ai_player);
    searcher.finish(depth, outcome, start)
}

/// Alpha-beta at depth 1, 2, ... `max_depth`, sharing one `time_limit`.
///
/// Keeps the result of the deepest depth that finished in time and stops at
/// the first depth that runs out. Node and cutoff counts cover every
/// iteration. If not even depth 1 finishes, the aborted result is returned.
pub fn iterative_deepening(
    state: &GameState,
    max_depth: u32,
    time_limit: Duration,
    ai_player: Player,
    weights: &EvalWeights,
) -> SearchResult {
    let start = Instant::now();
    let deadline = start + time_limit;
    let mut totals = SearchStats::new();
    let mut completed: Option<SearchResult> = None;
    let mut last = None;

    for depth in 1..=max_depth {
        let result = alpha_beta(state, depth, ai_player, weights, Some(deadline));
        totals.merge(&result.stats);
        if result.aborted() {
            debug!(depth, "iteration out of time");
            totals.aborted = true;
            last = Some(result);
            break;
        }
        debug!(
            depth,
            score = result.score,
            best_move = ?result.best_move,
            nodes = result.stats.nodes,
            "iteration complete"
        );
        totals.depth_completed = depth;
        completed = Some(result);
    }

    totals.elapsed = start.elapsed();
    let (score, best_move) = match completed.or(last) {
        Some(result) => (result.score, result.best_move),
        // max_depth of 0: nothing searched
        None => (evaluate(state, ai_player, weights), None),
    };
    SearchResult {
        score,
        best_move,
        stats: totals,
    }
}
