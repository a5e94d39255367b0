//! Action dispatch for a live game: the single entry point a front-end or
//! game loop drives.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{GameState, Location, Move, MoveError, Outcome, Pos};

/// Everything a front-end can ask of a running game.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum GameAction {
    /// Play a move for the side to move.
    Move(Move),
    /// Throw the current game away and start a fresh one.
    Restart,
    /// Stop play but keep the final board on display.
    ShowBoard,
    /// Begin (or resume) play on the current state.
    StartGame,
    /// Back to the menu: fresh state, not started.
    EndGame,
    /// Select the piece on a cell before moving it.
    TouchPiece { from: Pos },
}

/// A game plus the bits of UI state the reducer owns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    state: GameState,
    started: bool,
    touched: Option<Pos>,
    /// Bumped on every restart or end; results computed for an older
    /// generation are stale.
    generation: u64,
}

impl GameSession {
    /// A fresh session, not yet started.
    pub fn new() -> GameSession {
        GameSession::default()
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn is_started(&self) -> bool {
        self.started
    }

    #[inline]
    pub fn touched(&self) -> Option<Pos> {
        self.touched
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Apply one action.
    ///
    /// Only `Move` can fail; a rejected move leaves the session untouched.
    pub fn dispatch(&mut self, action: GameAction) -> Result<(), MoveError> {
        match action {
            GameAction::Move(mov) => self.play(mov)?,
            GameAction::Restart => {
                self.reset(true);
                debug!(generation = self.generation, "game restarted");
            }
            GameAction::EndGame => {
                self.reset(false);
                debug!(generation = self.generation, "game ended");
            }
            GameAction::ShowBoard => {
                self.started = false;
                self.touched = None;
            }
            GameAction::StartGame => self.started = true,
            GameAction::TouchPiece { from } => {
                let owned = from.is_valid()
                    && self.state.board().top_owner(from) == Some(self.state.turn());
                self.touched = owned.then_some(from);
            }
        }
        Ok(())
    }

    /// Legal destinations of the touched piece, in generation order.
    pub fn touched_destinations(&self) -> Vec<Pos> {
        let Some(from) = self.touched else {
            return Vec::new();
        };
        self.state
            .possible_moves()
            .iter()
            .filter(|mov| mov.from == Location::Board(from))
            .map(|mov| mov.to)
            .collect()
    }

    fn play(&mut self, mov: Move) -> Result<(), MoveError> {
        if !self.started {
            return Err(MoveError::NotStarted);
        }
        self.state.try_apply(mov)?;
        self.touched = None;
        debug!(%mov, "move played");

        match self.state.outcome() {
            Some(Outcome::Win(player)) => info!(?player, "game won"),
            Some(Outcome::Draw) => info!("game drawn"),
            None => {}
        }
        Ok(())
    }

    fn reset(&mut self, started: bool) {
        self.state = GameState::new();
        self.started = started;
        self.touched = None;
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Player;

    fn at(row: u8, col: u8) -> Pos {
        Pos::from_row_col(row, col)
    }

    fn started() -> GameSession {
        let mut session = GameSession::new();
        session.dispatch(GameAction::StartGame).unwrap();
        session
    }

    #[test]
    fn test_move_requires_start() {
        let mut session = GameSession::new();
        let mov = Move::place(Player::One, 0, at(0, 0));
        assert_eq!(session.dispatch(GameAction::Move(mov)), Err(MoveError::NotStarted));
        assert_eq!(session.state(), &GameState::new());

        session.dispatch(GameAction::StartGame).unwrap();
        assert!(session.dispatch(GameAction::Move(mov)).is_ok());
        assert_eq!(session.state().turn(), Player::Two);
    }

    #[test]
    fn test_rejected_move_leaves_state() {
        let mut session = started();
        let before = session.clone();
        let err = session.dispatch(GameAction::Move(Move::place(Player::Two, 0, at(0, 0))));
        assert!(matches!(err, Err(MoveError::WrongTurn { .. })));
        assert_eq!(session, before);
    }

    #[test]
    fn test_restart_and_end_bump_generation() {
        let mut session = started();
        session
            .dispatch(GameAction::Move(Move::place(Player::One, 0, at(1, 1))))
            .unwrap();

        session.dispatch(GameAction::Restart).unwrap();
        assert_eq!(session.generation(), 1);
        assert!(session.is_started());
        assert!(session.state().board().is_empty(at(1, 1)));

        session.dispatch(GameAction::EndGame).unwrap();
        assert_eq!(session.generation(), 2);
        assert!(!session.is_started());
    }

    #[test]
    fn test_show_board_keeps_position() {
        let mut session = started();
        session
            .dispatch(GameAction::Move(Move::place(Player::One, 0, at(2, 2))))
            .unwrap();
        session.dispatch(GameAction::ShowBoard).unwrap();

        assert!(!session.is_started());
        assert_eq!(session.state().board().top_owner(at(2, 2)), Some(Player::One));
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn test_touch_piece() {
        let mut session = started();
        session
            .dispatch(GameAction::Move(Move::place(Player::One, 0, at(0, 0))))
            .unwrap();

        // Player One's piece is not touchable on Player Two's turn.
        session.dispatch(GameAction::TouchPiece { from: at(0, 0) }).unwrap();
        assert_eq!(session.touched(), None);
        assert!(session.touched_destinations().is_empty());

        session
            .dispatch(GameAction::Move(Move::place(Player::Two, 0, at(3, 3))))
            .unwrap();
        session.dispatch(GameAction::TouchPiece { from: at(0, 0) }).unwrap();
        assert_eq!(session.touched(), Some(at(0, 0)));

        // Equal sizes cannot capture, so only the empty cells remain.
        let targets = session.touched_destinations();
        assert_eq!(targets.len(), 14);
        assert!(!targets.contains(&at(3, 3)));
        assert!(!targets.contains(&at(0, 0)));

        session
            .dispatch(GameAction::Move(Move::slide(Player::One, at(0, 0), at(0, 1))))
            .unwrap();
        assert_eq!(session.touched(), None);
    }

    #[test]
    fn test_win_through_dispatch() {
        let mut session = started();
        let script = [
            Move::place(Player::One, 0, at(0, 0)),
            Move::place(Player::Two, 0, at(3, 0)),
            Move::place(Player::One, 1, at(0, 1)),
            Move::place(Player::Two, 1, at(3, 1)),
            Move::place(Player::One, 2, at(0, 2)),
            Move::place(Player::Two, 2, at(3, 2)),
            Move::place(Player::One, 0, at(0, 3)),
        ];
        for mov in script {
            session.dispatch(GameAction::Move(mov)).unwrap();
        }
        assert_eq!(session.state().winner(), Some(Player::One));
        assert_eq!(
            session.dispatch(GameAction::Move(Move::place(Player::Two, 0, at(3, 3)))),
            Err(MoveError::GameOver)
        );
    }
}
