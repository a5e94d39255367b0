//! Gobblet game logic: a 4×4 stacking game played for four in a row.
//!
//! # Board Layout
//!
//! ```text
//! Cell indices (row-major order), with their notation:
//!    0 a1   1 b1   2 c1   3 d1
//!    4 a2   5 b2   6 c2   7 d2
//!    8 a3   9 b3  10 c3  11 d3
//!   12 a4  13 b4  14 c4  15 d4
//! ```
//!
//! # Pieces
//!
//! Each player owns twelve pieces split over three reserve slots. A slot holds
//! one piece of every size, stacked Small (bottom) to XLarge (top); only the
//! top piece of a slot can be played. A piece is identified by
//! `(player, size, slot)`, so exactly 24 identities exist in a game and each
//! one is always either in its reserve slot or on exactly one board stack.
//!
//! # Rules
//!
//! - A piece lands on an empty cell, or on a strictly smaller top piece.
//! - A piece played from reserve may only cover an opponent piece that is part
//!   of an opponent three-in-a-row threat.
//! - Four visible pieces of one player in a row, column or main diagonal win.
//! - The same pair of positions recurring three times ends the game drawn.

mod board;
mod error;
mod history;
mod rules;
mod session;
mod state;

#[cfg(feature = "wasm")]
pub mod wasm;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use board::{Board, Reserve, Stack, LINES};
pub use error::MoveError;
pub use history::BoardHistory;
pub use rules::{is_legal, legal_moves, successors, three_in_row, threat_cells, winner};
pub use session::{GameAction, GameSession};
pub use state::{GameState, Outcome};

/// Board width and height.
pub const BOARD_SIZE: u8 = 4;
/// Number of cells on the board.
pub const CELLS: usize = 16;
/// Reserve slots per player.
pub const RESERVE_SLOTS: u8 = 3;
/// Pieces needed in a line to win.
pub const WIN_LENGTH: usize = 4;

/// Player identifier.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// Get the opponent player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Index into per-player arrays (0 or 1).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    /// Both players, first mover first.
    pub fn all() -> impl Iterator<Item = Player> {
        [Player::One, Player::Two].into_iter()
    }
}

/// Piece size, ordered smallest to largest.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Size {
    Small = 0,
    Medium = 1,
    Large = 2,
    XLarge = 3,
}

impl Size {
    /// Check if this size can gobble (cover) another size.
    #[inline]
    pub fn can_gobble(self, other: Size) -> bool {
        self > other
    }

    /// Ordinal rank, 0 for Small up to 3 for XLarge.
    #[inline]
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Convert from index (0..4) to Size.
    #[inline]
    pub fn from_index(idx: usize) -> Option<Size> {
        match idx {
            0 => Some(Size::Small),
            1 => Some(Size::Medium),
            2 => Some(Size::Large),
            3 => Some(Size::XLarge),
            _ => None,
        }
    }

    /// Get all sizes, smallest first.
    pub fn all() -> impl Iterator<Item = Size> {
        [Size::Small, Size::Medium, Size::Large, Size::XLarge].into_iter()
    }
}

/// Position on the 4x4 board (0-15), row-major.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos(pub u8);

impl Pos {
    /// Create a position from row and column (0-3 each).
    #[inline]
    pub fn from_row_col(row: u8, col: u8) -> Pos {
        debug_assert!(row < BOARD_SIZE && col < BOARD_SIZE);
        Pos(row * BOARD_SIZE + col)
    }

    /// Get the row (0-3).
    #[inline]
    pub fn row(self) -> u8 {
        self.0 / BOARD_SIZE
    }

    /// Get the column (0-3).
    #[inline]
    pub fn col(self) -> u8 {
        self.0 % BOARD_SIZE
    }

    /// Check if this is a valid position (0-15).
    #[inline]
    pub fn is_valid(self) -> bool {
        (self.0 as usize) < CELLS
    }

    #[inline]
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all 16 positions in row-major order.
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..CELLS as u8).map(Pos)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col()) as char, self.row() + 1)
    }
}

/// Where a piece sits: one of its owner's reserve slots, or a board cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Location {
    Reserve(u8),
    Board(Pos),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Reserve(slot) => write!(f, "R{}", slot),
            Location::Board(pos) => write!(f, "{}", pos),
        }
    }
}

/// A single piece with its identity and current location.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub player: Player,
    pub size: Size,
    /// Reserve slot the piece started in; distinguishes same-sized pieces.
    pub slot: u8,
    pub location: Location,
}

impl Piece {
    /// Identity of the piece, independent of where it currently is.
    #[inline]
    pub fn identity(&self) -> (Player, Size, u8) {
        (self.player, self.size, self.slot)
    }
}

/// A move: relocate the top piece at `from` onto the cell `to`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Move {
    pub player: Player,
    pub from: Location,
    pub to: Pos,
}

impl Move {
    /// Place the top piece of a reserve slot.
    #[inline]
    pub fn place(player: Player, slot: u8, to: Pos) -> Move {
        Move {
            player,
            from: Location::Reserve(slot),
            to,
        }
    }

    /// Move a visible piece from one cell to another.
    #[inline]
    pub fn slide(player: Player, from: Pos, to: Pos) -> Move {
        Move {
            player,
            from: Location::Board(from),
            to,
        }
    }

    /// Check if this is a placement from reserves.
    #[inline]
    pub fn is_place(&self) -> bool {
        matches!(self.from, Location::Reserve(_))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.from {
            Location::Reserve(_) => write!(f, "{}:{}", self.from, self.to),
            Location::Board(_) => write!(f, "{}-{}", self.from, self.to),
        }
    }
}
