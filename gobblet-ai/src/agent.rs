//! Algorithm dispatch: turn a [`SearchRequest`] into a move.

use std::time::{Duration, Instant};

use gobblet_core::{GameState, Player};
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Algorithm;
use crate::eval::{evaluate, EvalWeights};
use crate::search::{alpha_beta, iterative_deepening, minimax, SearchResult};
use crate::stats::SearchStats;

/// Everything a search needs besides the position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub algorithm: Algorithm,
    /// Player the scores are computed for
    pub ai_player: Player,
    pub weights: EvalWeights,
}

impl SearchRequest {
    /// A request using the default evaluator weights.
    pub fn new(algorithm: Algorithm, ai_player: Player) -> Self {
        Self {
            algorithm,
            ai_player,
            weights: EvalWeights::default(),
        }
    }

    /// Run the configured algorithm on `state`.
    pub fn run(&self, state: &GameState) -> SearchResult {
        choose_move(state, self.algorithm, self.ai_player, &self.weights)
    }
}

/// Pick a move for the side to move with the given algorithm.
///
/// The result carries no move when the game is over or the side to move has
/// nothing legal to play.
pub fn choose_move(
    state: &GameState,
    algorithm: Algorithm,
    ai_player: Player,
    weights: &EvalWeights,
) -> SearchResult {
    let result = match algorithm {
        Algorithm::Random => random_move(state, ai_player, weights),
        Algorithm::Minimax { depth } => minimax(state, depth, ai_player, weights),
        Algorithm::AlphaBeta { depth } => alpha_beta(state, depth, ai_player, weights, None),
        Algorithm::IterativeDeepening {
            max_depth,
            time_limit_ms,
        } => iterative_deepening(
            state,
            max_depth,
            Duration::from_millis(time_limit_ms),
            ai_player,
            weights,
        ),
    };
    debug!(
        ?algorithm,
        best_move = ?result.best_move,
        score = result.score,
        "{}",
        result.stats.summary()
    );
    result
}

fn random_move(state: &GameState, ai_player: Player, weights: &EvalWeights) -> SearchResult {
    let start = Instant::now();
    let best_move = state.possible_moves().choose(&mut rand::rng()).copied();
    SearchResult {
        score: evaluate(state, ai_player, weights),
        best_move,
        stats: SearchStats {
            nodes: 1,
            elapsed: start.elapsed(),
            ..SearchStats::new()
        },
    }
}
