//! Board and reserve storage: piece stacks and the winning lines.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Location, Piece, Player, Pos, Size, CELLS, RESERVE_SLOTS};

/// An ordered pile of pieces on one cell or reserve slot.
///
/// Insertion order is stacking order; only the last piece is visible.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stack(Vec<Piece>);

impl Stack {
    /// Create an empty stack.
    #[inline]
    pub fn new() -> Stack {
        Stack(Vec::new())
    }

    /// The visible (topmost) piece.
    #[inline]
    pub fn top(&self) -> Option<&Piece> {
        self.0.last()
    }

    #[inline]
    pub fn push(&mut self, piece: Piece) {
        self.0.push(piece);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Piece> {
        self.0.pop()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Remove the first piece of the given size, wherever it sits.
    pub(crate) fn take(&mut self, size: Size) -> Option<Piece> {
        let idx = self.0.iter().position(|piece| piece.size == size)?;
        Some(self.0.remove(idx))
    }

    /// Iterate bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.0.iter()
    }
}

// ========== Winning Lines ==========

const fn line(start: u8, step: u8) -> [Pos; 4] {
    [
        Pos(start),
        Pos(start + step),
        Pos(start + 2 * step),
        Pos(start + 3 * step),
    ]
}

/// The 10 winning lines: 4 rows, 4 columns, 2 diagonals.
pub const LINES: [[Pos; 4]; 10] = [
    line(0, 1),  // Row 0
    line(4, 1),  // Row 1
    line(8, 1),  // Row 2
    line(12, 1), // Row 3
    line(0, 4),  // Col 0
    line(1, 4),  // Col 1
    line(2, 4),  // Col 2
    line(3, 4),  // Col 3
    line(0, 5),  // Main diagonal
    line(3, 3),  // Anti-diagonal
];

/// The 4x4 grid of stacks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [Stack; CELLS],
}

impl Board {
    /// Create an empty board.
    pub fn new() -> Board {
        Board::default()
    }

    /// The stack at a cell.
    ///
    /// `top_piece`, `top_owner` and `is_empty` go through here and panic if
    /// `pos` is off the board; check [`Pos::is_valid`] on untrusted input.
    #[inline]
    pub fn stack(&self, pos: Pos) -> &Stack {
        debug_assert!(pos.is_valid(), "cell {} off the board", pos.0);
        &self.cells[pos.idx()]
    }

    /// Get the top (visible) piece at a position.
    /// Returns None if the cell is empty.
    #[inline]
    pub fn top_piece(&self, pos: Pos) -> Option<&Piece> {
        self.stack(pos).top()
    }

    /// Owner of the visible piece at a position.
    #[inline]
    pub fn top_owner(&self, pos: Pos) -> Option<Player> {
        self.top_piece(pos).map(|piece| piece.player)
    }

    /// Check if a cell is empty.
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.stack(pos).is_empty()
    }

    /// Check if a piece of the given size can cover this position.
    /// A piece can land if the cell is empty or the top piece is smaller.
    #[inline]
    pub fn can_place(&self, size: Size, pos: Pos) -> bool {
        match self.top_piece(pos) {
            None => true,
            Some(top) => size.can_gobble(top.size),
        }
    }

    /// Push a piece onto a cell, updating its location.
    /// Does NOT validate - caller must ensure move is legal.
    #[inline]
    pub fn push_piece(&mut self, pos: Pos, mut piece: Piece) {
        piece.location = Location::Board(pos);
        self.cells[pos.idx()].push(piece);
    }

    /// Remove the top piece from a cell.
    #[inline]
    pub fn pop_top(&mut self, pos: Pos) -> Option<Piece> {
        self.cells[pos.idx()].pop()
    }

    /// All pieces on the board, buried ones included.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.cells.iter().flat_map(Stack::iter)
    }

    /// Visible owners along a line.
    #[inline]
    pub fn line_owners(&self, line: &[Pos; 4]) -> [Option<Player>; 4] {
        line.map(|pos| self.top_owner(pos))
    }
}

impl fmt::Display for Board {
    /// One row per line; each cell shows its top piece as owner and size
    /// (`1S`, `2X`, ...) or `..` when empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..crate::BOARD_SIZE {
            let cells: Vec<String> = (0..crate::BOARD_SIZE)
                .map(|col| match self.top_piece(Pos::from_row_col(row, col)) {
                    None => "..".to_string(),
                    Some(piece) => {
                        let owner = match piece.player {
                            Player::One => '1',
                            Player::Two => '2',
                        };
                        let size = match piece.size {
                            Size::Small => 'S',
                            Size::Medium => 'M',
                            Size::Large => 'L',
                            Size::XLarge => 'X',
                        };
                        format!("{}{}", owner, size)
                    }
                })
                .collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}

/// One player's off-board pieces: three slots, each a stack of sizes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reserve {
    slots: [Stack; RESERVE_SLOTS as usize],
}

impl Reserve {
    /// A full reserve: every slot holds Small..XLarge with XLarge on top.
    pub fn full(player: Player) -> Reserve {
        let slots = std::array::from_fn(|slot| {
            let mut stack = Stack::new();
            for size in Size::all() {
                stack.push(Piece {
                    player,
                    size,
                    slot: slot as u8,
                    location: Location::Reserve(slot as u8),
                });
            }
            stack
        });
        Reserve { slots }
    }

    /// The stack in a slot, or None for an out-of-range slot.
    #[inline]
    pub fn slot(&self, slot: u8) -> Option<&Stack> {
        self.slots.get(slot as usize)
    }

    /// The playable piece of a slot.
    #[inline]
    pub fn top(&self, slot: u8) -> Option<&Piece> {
        self.slot(slot).and_then(Stack::top)
    }

    pub(crate) fn pop(&mut self, slot: u8) -> Option<Piece> {
        self.slots.get_mut(slot as usize).and_then(Stack::pop)
    }

    pub(crate) fn take(&mut self, slot: u8, size: Size) -> Option<Piece> {
        self.slots.get_mut(slot as usize).and_then(|stack| stack.take(size))
    }

    /// Return a piece to a slot, updating its location.
    pub(crate) fn push(&mut self, slot: u8, mut piece: Piece) -> bool {
        match self.slots.get_mut(slot as usize) {
            Some(stack) => {
                piece.location = Location::Reserve(slot);
                stack.push(piece);
                true
            }
            None => false,
        }
    }

    /// Number of pieces left across all slots.
    pub fn count(&self) -> usize {
        self.slots.iter().map(Stack::len).sum()
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.slots.iter().flat_map(Stack::iter)
    }
}
