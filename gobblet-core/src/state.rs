//! Game state and the move applier.

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::board::{Board, Reserve};
use crate::history::BoardHistory;
use crate::rules;
use crate::{Location, Move, MoveError, Piece, Player, Pos, Size};

/// How a finished game ended.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win(Player),
    Draw,
}

/// Full game state: board, reserves, side to move and derived fields.
///
/// Mutated only through [`GameState::apply`] (and its checked wrapper
/// [`GameState::try_apply`]). Search code clones the state once per branch;
/// every field is owned, so clones never share anything.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    reserves: [Reserve; 2],
    turn: Player,
    /// Cached legal moves for `turn`; empty once the game is over.
    possible_moves: Vec<Move>,
    outcome: Option<Outcome>,
    game_over: bool,
    history: BoardHistory,
}

impl GameState {
    /// Initial position: empty board, full reserves, Player One to move.
    pub fn new() -> GameState {
        let mut state = GameState {
            board: Board::new(),
            reserves: [Reserve::full(Player::One), Reserve::full(Player::Two)],
            turn: Player::One,
            possible_moves: Vec::new(),
            outcome: None,
            game_over: false,
            history: BoardHistory::new(),
        };
        state.refresh_moves();
        state
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn reserve(&self, player: Player) -> &Reserve {
        &self.reserves[player.index()]
    }

    /// The side to move (or, once the game is over, the side that moved last).
    #[inline]
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// Legal moves for the side to move.
    #[inline]
    pub fn possible_moves(&self) -> &[Move] {
        &self.possible_moves
    }

    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// The winning player, if the game ended with a win.
    pub fn winner(&self) -> Option<Player> {
        match self.outcome {
            Some(Outcome::Win(player)) => Some(player),
            _ => None,
        }
    }

    pub fn is_draw(&self) -> bool {
        self.outcome == Some(Outcome::Draw)
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn history(&self) -> &BoardHistory {
        &self.history
    }

    /// The top piece at a source location. Reserve locations are read from
    /// `player`'s reserve.
    pub fn top_at(&self, player: Player, location: Location) -> Option<&Piece> {
        match location {
            Location::Reserve(slot) => self.reserve(player).top(slot),
            Location::Board(pos) if pos.is_valid() => self.board.top_piece(pos),
            Location::Board(_) => None,
        }
    }

    /// Every piece in the game: board stacks first, then both reserves.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.board
            .pieces()
            .chain(self.reserves.iter().flat_map(Reserve::pieces))
    }

    // ========== Move Applier ==========

    /// Apply a move in place.
    ///
    /// Pops the top piece at the source, pushes it on the destination, records
    /// history, then settles the result: a four-in-a-row wins (the mover's own
    /// line takes precedence), otherwise a repeated cycle draws. If the game
    /// continues, the turn passes and the legal-move cache is rebuilt; a side
    /// left without legal moves ends the game drawn.
    ///
    /// Does NOT validate - callers must check [`crate::is_legal`] first or use
    /// [`GameState::try_apply`]. A move on a finished game or from an empty
    /// source is ignored.
    pub fn apply(&mut self, mov: Move) {
        if self.game_over {
            trace!(%mov, "move ignored, game is over");
            return;
        }
        if !mov.to.is_valid() || !self.move_piece(mov.player, mov.from, Location::Board(mov.to)) {
            trace!(%mov, "move ignored, nothing to move");
            return;
        }
        trace!(%mov, player = ?mov.player, "move applied");

        if mov.player == Player::Two {
            self.history.record(&self.board);
        }

        if let Some(winner) = rules::four_in_row(&self.board, mov.player) {
            self.finish(Outcome::Win(winner));
            return;
        }
        if self.history.is_repeating() {
            self.finish(Outcome::Draw);
            return;
        }

        self.turn = mov.player.opponent();
        self.refresh_moves();
        if self.possible_moves.is_empty() {
            self.finish(Outcome::Draw);
        }
    }

    /// Validate and apply a move. On error the state is left unchanged.
    pub fn try_apply(&mut self, mov: Move) -> Result<(), MoveError> {
        if let Err(err) = self.check(&mov) {
            warn!(%mov, error = %err, "move rejected");
            return Err(err);
        }
        self.apply(mov);
        Ok(())
    }

    /// Check a move against the game phase, the turn and the legality rules.
    pub fn check(&self, mov: &Move) -> Result<(), MoveError> {
        if self.game_over {
            return Err(MoveError::GameOver);
        }
        if mov.player != self.turn {
            return Err(MoveError::WrongTurn {
                expected: self.turn,
                actual: mov.player,
            });
        }
        if !rules::is_legal(self, mov) {
            return Err(MoveError::Illegal(*mov));
        }
        Ok(())
    }

    // ========== Position Setup ==========

    /// Move the top piece at `from` to `to` without any rule checks, then
    /// rebuild the legal-move cache. Turn, outcome and history are untouched.
    ///
    /// Reserve locations refer to `player`'s reserve for the source and to the
    /// piece owner's reserve for the destination. Returns false (and changes
    /// nothing) if the source is empty or either location is out of range.
    pub fn relocate(&mut self, player: Player, from: Location, to: Location) -> bool {
        let moved = self.move_piece(player, from, to);
        if moved {
            self.refresh_moves();
        }
        moved
    }

    /// Take a specific piece out of its reserve slot and put it on `to`,
    /// even if larger pieces of that slot are still in reserve.
    ///
    /// Intended for building positions; does NOT validate.
    pub fn setup_piece(&mut self, player: Player, size: Size, slot: u8, to: Pos) -> bool {
        if !to.is_valid() {
            return false;
        }
        match self.reserves[player.index()].take(slot, size) {
            Some(piece) => {
                self.board.push_piece(to, piece);
                self.refresh_moves();
                true
            }
            None => false,
        }
    }

    /// Hand the move to `player` and rebuild the legal-move cache.
    pub fn set_turn(&mut self, player: Player) {
        self.turn = player;
        self.refresh_moves();
    }

    fn move_piece(&mut self, player: Player, from: Location, to: Location) -> bool {
        let destination_ok = match to {
            Location::Board(pos) => pos.is_valid(),
            Location::Reserve(slot) => slot < crate::RESERVE_SLOTS,
        };
        if !destination_ok {
            return false;
        }

        let piece = match from {
            Location::Reserve(slot) => self.reserves[player.index()].pop(slot),
            Location::Board(pos) if pos.is_valid() => self.board.pop_top(pos),
            Location::Board(_) => None,
        };
        let Some(piece) = piece else {
            return false;
        };

        match to {
            Location::Board(pos) => self.board.push_piece(pos, piece),
            Location::Reserve(slot) => {
                self.reserves[piece.player.index()].push(slot, piece);
            }
        }
        true
    }

    fn refresh_moves(&mut self) {
        self.possible_moves = rules::legal_moves(self);
    }

    fn finish(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
        self.game_over = true;
        self.possible_moves.clear();
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(row: u8, col: u8) -> Pos {
        Pos::from_row_col(row, col)
    }

    #[test]
    fn test_initial_state() {
        let state = GameState::new();
        assert_eq!(state.turn(), Player::One);
        assert!(!state.is_game_over());
        assert_eq!(state.outcome(), None);
        assert_eq!(state.possible_moves().len(), 48);
        assert_eq!(state.pieces().count(), 24);
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_apply_place_move() {
        let mut state = GameState::new();
        state.apply(Move::place(Player::One, 0, at(0, 0)));

        let top = state.board().top_piece(at(0, 0)).copied();
        assert_eq!(top.map(|p| (p.player, p.size, p.slot)), Some((Player::One, Size::XLarge, 0)));
        assert_eq!(top.map(|p| p.location), Some(Location::Board(at(0, 0))));
        assert_eq!(state.reserve(Player::One).top(0).map(|p| p.size), Some(Size::Large));
        assert_eq!(state.turn(), Player::Two);
        // First player's moves are not recorded.
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_apply_records_second_player_moves() {
        let mut state = GameState::new();
        state.apply(Move::place(Player::One, 0, at(0, 0)));
        state.apply(Move::place(Player::Two, 0, at(3, 3)));
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.turn(), Player::One);
    }

    #[test]
    fn test_apply_slide_reveals_piece() {
        let mut state = GameState::new();
        state.setup_piece(Player::One, Size::Small, 0, at(1, 1));
        state.setup_piece(Player::Two, Size::Large, 0, at(1, 1));
        state.set_turn(Player::Two);

        state.apply(Move::slide(Player::Two, at(1, 1), at(2, 2)));
        assert_eq!(state.board().top_owner(at(1, 1)), Some(Player::One));
        assert_eq!(state.board().top_owner(at(2, 2)), Some(Player::Two));
    }

    #[test]
    fn test_apply_from_empty_source_is_ignored() {
        let mut state = GameState::new();
        let before = state.clone();
        state.apply(Move::slide(Player::One, at(0, 0), at(1, 1)));
        assert_eq!(state, before);
    }

    #[test]
    fn test_try_apply_rejects_without_mutation() {
        let mut state = GameState::new();
        state.apply(Move::place(Player::One, 0, at(0, 0)));
        let before = state.clone();

        // Wrong player
        let err = state.try_apply(Move::place(Player::One, 1, at(1, 1)));
        assert_eq!(
            err,
            Err(MoveError::WrongTurn {
                expected: Player::Two,
                actual: Player::One
            })
        );
        // XLarge on XLarge is never legal
        let mov = Move::place(Player::Two, 0, at(0, 0));
        assert_eq!(state.try_apply(mov), Err(MoveError::Illegal(mov)));
        assert_eq!(state, before);

        assert!(state.try_apply(Move::place(Player::Two, 0, at(0, 1))).is_ok());
    }

    #[test]
    fn test_win_on_move() {
        let mut state = GameState::new();
        for col in 0..3 {
            state.setup_piece(Player::One, Size::Large, col, at(0, col));
        }
        state.apply(Move::place(Player::One, 0, at(0, 3)));

        assert!(state.is_game_over());
        assert_eq!(state.winner(), Some(Player::One));
        // Turn does not pass after the final move.
        assert_eq!(state.turn(), Player::One);
        assert!(state.possible_moves().is_empty());
        assert_eq!(
            state.try_apply(Move::place(Player::Two, 0, at(3, 3))),
            Err(MoveError::GameOver)
        );
    }

    #[test]
    fn test_reveal_gives_opponent_the_win() {
        // Player Two lifts a piece that was blocking Player One's row.
        let mut state = GameState::new();
        for col in 0..3 {
            state.setup_piece(Player::One, Size::Small, col, at(1, col));
        }
        state.setup_piece(Player::One, Size::Medium, 0, at(1, 3));
        state.setup_piece(Player::Two, Size::XLarge, 0, at(1, 3));
        state.set_turn(Player::Two);

        state.apply(Move::slide(Player::Two, at(1, 3), at(3, 3)));
        assert_eq!(state.winner(), Some(Player::One));
    }

    #[test]
    fn test_mover_line_takes_precedence() {
        // Player Two completes column 2 while uncovering Player One's column 3.
        let mut state = GameState::new();
        state.setup_piece(Player::One, Size::Medium, 0, at(0, 3));
        for row in 1..4 {
            state.setup_piece(Player::One, Size::Small, row - 1, at(row, 3));
            state.setup_piece(Player::Two, Size::Large, row - 1, at(row, 2));
        }
        state.setup_piece(Player::Two, Size::XLarge, 0, at(0, 3));
        state.set_turn(Player::Two);
        assert!(!state.is_game_over());

        state.apply(Move::slide(Player::Two, at(0, 3), at(0, 2)));
        assert_eq!(state.board().top_owner(at(0, 3)), Some(Player::One));
        assert_eq!(state.winner(), Some(Player::Two));
    }

    #[test]
    fn test_repetition_draw() {
        let mut state = GameState::new();
        state.apply(Move::place(Player::One, 0, at(0, 0)));
        state.apply(Move::place(Player::Two, 0, at(3, 3)));

        // Both sides shuffle a piece back and forth.
        let cycle = [
            Move::slide(Player::One, at(0, 0), at(0, 1)),
            Move::slide(Player::Two, at(3, 3), at(3, 2)),
            Move::slide(Player::One, at(0, 1), at(0, 0)),
            Move::slide(Player::Two, at(3, 2), at(3, 3)),
        ];
        let mut plies = 0;
        'outer: for _ in 0..4 {
            for mov in cycle {
                assert!(!state.is_game_over());
                state.try_apply(mov).unwrap();
                plies += 1;
                if state.is_game_over() {
                    break 'outer;
                }
            }
        }
        assert!(state.is_draw());
        assert_eq!(state.winner(), None);
        // The initial snapshot plus five cycle snapshots complete the window.
        assert_eq!(plies, 10);
    }

    #[test]
    fn test_relocate_round_trip() {
        let mut state = GameState::new();
        let before = state.clone();
        assert!(state.relocate(Player::One, Location::Reserve(1), Location::Board(at(2, 2))));
        assert!(state.relocate(Player::One, Location::Board(at(2, 2)), Location::Reserve(1)));
        assert_eq!(state, before);
    }

    #[test]
    fn test_relocate_rejects_bad_locations() {
        let mut state = GameState::new();
        assert!(!state.relocate(Player::One, Location::Board(at(0, 0)), Location::Board(at(1, 1))));
        assert!(!state.relocate(Player::One, Location::Reserve(3), Location::Board(at(1, 1))));
        assert!(!state.relocate(Player::One, Location::Reserve(0), Location::Board(Pos(16))));
        assert!(!state.relocate(Player::One, Location::Reserve(0), Location::Reserve(7)));
        assert_eq!(state.pieces().count(), 24);
    }
}
