//! Move legality, successor generation and win detection.

use crate::board::{Board, LINES};
use crate::{GameState, Location, Move, Piece, Player, Pos, RESERVE_SLOTS};

// ========== Win Detection ==========

/// Cells of every three-in-a-row window held by `owner`.
///
/// Windows are the length-3 runs inside the 10 winning lines. Cells are
/// reported once each, in order of discovery.
pub fn threat_cells(board: &Board, owner: Player) -> Vec<Pos> {
    let mut cells = Vec::new();
    for line in &LINES {
        for window in line.windows(3) {
            if window.iter().all(|&pos| board.top_owner(pos) == Some(owner)) {
                for &pos in window {
                    if !cells.contains(&pos) {
                        cells.push(pos);
                    }
                }
            }
        }
    }
    cells
}

/// Threat cells of the opponent of the side to move.
pub fn three_in_row(state: &GameState) -> Vec<Pos> {
    threat_cells(state.board(), state.turn().opponent())
}

/// The player with four visible pieces in a line, if any.
///
/// The side to move is checked first: inside the move applier the turn has
/// not passed yet, so the mover wins when both players complete a line.
pub fn winner(state: &GameState) -> Option<Player> {
    four_in_row(state.board(), state.turn())
}

pub(crate) fn four_in_row(board: &Board, first: Player) -> Option<Player> {
    [first, first.opponent()].into_iter().find(|&player| {
        LINES
            .iter()
            .any(|line| board.line_owners(line).iter().all(|&owner| owner == Some(player)))
    })
}

// ========== Legality ==========

/// Can `piece`, lifted from `from`, land on `to`?
///
/// `threats` are the opponent's threat cells, consulted only for reserve drops.
#[inline]
fn lands(board: &Board, piece: &Piece, from: Location, to: Pos, threats: &[Pos]) -> bool {
    if board.is_empty(to) {
        return true;
    }
    if matches!(from, Location::Reserve(_)) && !threats.contains(&to) {
        return false;
    }
    board.can_place(piece.size, to)
}

/// Check a move against the placement rules.
///
/// 1. The source must hold a piece of the acting player on top.
/// 2. An empty destination is always fine.
/// 3. Otherwise the moving piece must be strictly larger than the target.
/// 4. A piece from reserve may only cover a cell of an opponent
///    three-in-a-row; board pieces are exempt.
///
/// The turn and game phase are not checked here; see [`GameState::check`].
pub fn is_legal(state: &GameState, mov: &Move) -> bool {
    if !mov.to.is_valid() {
        return false;
    }
    let piece = match state.top_at(mov.player, mov.from) {
        Some(piece) if piece.player == mov.player => *piece,
        _ => return false,
    };
    let threats = if mov.is_place() {
        threat_cells(state.board(), mov.player.opponent())
    } else {
        Vec::new()
    };
    lands(state.board(), &piece, mov.from, mov.to, &threats)
}

// ========== Move Generation ==========

/// Generate all legal moves for the side to move.
///
/// Order is deterministic: the mover's visible board pieces in row-major
/// order, then reserve slots 0..3. For each source, capture targets come
/// first (row-major), then empty cells (row-major). A finished game has no
/// moves.
pub fn legal_moves(state: &GameState) -> Vec<Move> {
    if state.is_game_over() {
        return Vec::new();
    }

    let player = state.turn();
    let board = state.board();
    let threats = threat_cells(board, player.opponent());

    // Loop once over the grid: own pieces, occupied cells, empty cells
    let mut own = Vec::new();
    let mut occupied = Vec::new();
    let mut empty = Vec::new();
    for pos in Pos::all() {
        match board.top_owner(pos) {
            Some(owner) => {
                if owner == player {
                    own.push(Location::Board(pos));
                }
                occupied.push(pos);
            }
            None => empty.push(pos),
        }
    }

    let mut moves = Vec::with_capacity(64);
    let sources = own.into_iter().chain((0..RESERVE_SLOTS).map(Location::Reserve));
    for from in sources {
        let Some(piece) = state.top_at(player, from).copied() else {
            continue;
        };
        for &to in &occupied {
            if lands(board, &piece, from, to, &threats) {
                moves.push(Move { player, from, to });
            }
        }
        moves.extend(empty.iter().map(|&to| Move { player, from, to }));
    }

    moves
}

/// Every legal move paired with the state it leads to.
///
/// Each successor is an independent deep copy of `state` with the move
/// applied; mutating one never affects another or the parent.
pub fn successors(state: &GameState) -> Vec<(Move, GameState)> {
    state
        .possible_moves()
        .iter()
        .map(|&mov| {
            let mut next = state.clone();
            next.apply(mov);
            (mov, next)
        })
        .collect()
}
