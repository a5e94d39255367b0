use thiserror::Error;

use crate::{Move, Player};

/// Why a move was refused. The state is never modified on error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("game has not started")]
    NotStarted,

    #[error("game is over")]
    GameOver,

    #[error("not {actual:?}'s turn, {expected:?} to move")]
    WrongTurn { expected: Player, actual: Player },

    #[error("illegal move {0}")]
    Illegal(Move),
}
