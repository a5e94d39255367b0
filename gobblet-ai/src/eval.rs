//! Static position evaluation.
//!
//! Scores are summed over the 10 winning lines. Every visible piece is worth
//! its size rank plus one, positive for the perspective player and negative
//! for the opponent. Lines held by one side only earn a potential term on
//! top: a bonus per piece for the perspective player, a penalty per piece for
//! the opponent, and a large extra term once a line is complete.

use gobblet_core::{GameState, Player, LINES, WIN_LENGTH};
use serde::{Deserialize, Serialize};

/// Tunable evaluator constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalWeights {
    /// Per piece in a line held only by the perspective player
    pub line_bonus: i32,
    /// Per piece in a line held only by the opponent
    pub line_penalty: i32,
    /// Extra for a complete line of the perspective player
    pub win_bonus: i32,
    /// Extra against a complete line of the opponent
    pub loss_penalty: i32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            line_bonus: 15,
            line_penalty: 10,
            win_bonus: 1000,
            loss_penalty: 1000,
        }
    }
}

/// Score `state` from `perspective`'s point of view. Higher is better.
///
/// A drawn game scores 0.
pub fn evaluate(state: &GameState, perspective: Player, weights: &EvalWeights) -> i32 {
    if state.is_draw() {
        return 0;
    }

    let board = state.board();
    let mut score = 0;
    for line in &LINES {
        let mut mine = 0;
        let mut theirs = 0;
        for &pos in line {
            let Some(piece) = board.top_piece(pos) else {
                continue;
            };
            let value = piece.size.rank() as i32 + 1;
            if piece.player == perspective {
                score += value;
                mine += 1;
            } else {
                score -= value;
                theirs += 1;
            }
        }

        if theirs == 0 && mine > 0 {
            score += weights.line_bonus * mine;
            if mine as usize == WIN_LENGTH {
                score += weights.win_bonus;
            }
        } else if mine == 0 && theirs > 0 {
            score -= weights.line_penalty * theirs;
            if theirs as usize == WIN_LENGTH {
                score -= weights.loss_penalty;
            }
        }
    }
    score
}
