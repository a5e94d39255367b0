//! WASM bindings for gobblet-core
//!
//! Provides a JavaScript-friendly API over a [`GameSession`].

use wasm_bindgen::prelude::*;

use crate::{GameAction, GameSession, Location, Move, Player, Pos};

/// WASM-friendly wrapper around a game session
#[wasm_bindgen]
pub struct WasmGame {
    inner: GameSession,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a new, already started game
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        let mut inner = GameSession::new();
        let _ = inner.dispatch(GameAction::StartGame);
        WasmGame { inner }
    }

    /// Current player (1 or 2)
    #[wasm_bindgen(js_name = currentPlayer)]
    pub fn current_player(&self) -> u8 {
        player_number(self.inner.state().turn())
    }

    /// Winner: 0 (none), 1 (P1), or 2 (P2)
    pub fn winner(&self) -> u8 {
        self.inner.state().winner().map_or(0, player_number)
    }

    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.inner.state().is_game_over()
    }

    /// Get game result: "ongoing", "player_one_wins", "player_two_wins", or "draw"
    pub fn result(&self) -> String {
        let state = self.inner.state();
        match state.winner() {
            Some(Player::One) => "player_one_wins".to_string(),
            Some(Player::Two) => "player_two_wins".to_string(),
            None if state.is_draw() => "draw".to_string(),
            None => "ongoing".to_string(),
        }
    }

    /// Get legal moves as JSON array
    /// Each move is { to: [row, col], from: [row, col] | null, slot: 0..3 | null }
    #[wasm_bindgen(js_name = legalMoves)]
    pub fn legal_moves(&self) -> JsValue {
        let moves: Vec<WasmMove> = self
            .inner
            .state()
            .possible_moves()
            .iter()
            .copied()
            .map(WasmMove::from)
            .collect();
        serde_wasm_bindgen::to_value(&moves).unwrap_or(JsValue::NULL)
    }

    /// Apply a move for the side to move. Returns true if successful.
    /// For placement: applyMove(toRow, toCol, null, null, slot)
    /// For slide: applyMove(toRow, toCol, fromRow, fromCol, null)
    #[wasm_bindgen(js_name = applyMove)]
    pub fn apply_move(
        &mut self,
        to_row: u8,
        to_col: u8,
        from_row: Option<u8>,
        from_col: Option<u8>,
        slot: Option<u8>,
    ) -> bool {
        let Some(to) = cell(to_row, to_col) else {
            return false;
        };
        let player = self.inner.state().turn();
        let mov = match (from_row.zip(from_col), slot) {
            (Some((fr, fc)), _) => match cell(fr, fc) {
                Some(from) => Move::slide(player, from, to),
                None => return false,
            },
            (None, Some(slot)) => Move::place(player, slot, to),
            (None, None) => return false,
        };
        self.inner.dispatch(GameAction::Move(mov)).is_ok()
    }

    /// Get cell stack at position as array of [player, size, player, size, ...]
    /// Bottom to top order, sizes 1 (Small) to 4 (XLarge)
    #[wasm_bindgen(js_name = cellStack)]
    pub fn cell_stack(&self, row: u8, col: u8) -> Vec<u8> {
        let Some(pos) = cell(row, col) else {
            return vec![];
        };
        self.inner
            .state()
            .board()
            .stack(pos)
            .iter()
            .flat_map(|piece| [player_number(piece.player), piece.size.rank() + 1])
            .collect()
    }

    /// Playable reserve size per slot for a player (0 when the slot is empty)
    pub fn reserves(&self, player: u8) -> Vec<u8> {
        let p = if player == 1 { Player::One } else { Player::Two };
        let reserve = self.inner.state().reserve(p);
        (0..crate::RESERVE_SLOTS)
            .map(|slot| reserve.top(slot).map_or(0, |piece| piece.size.rank() + 1))
            .collect()
    }

    pub fn restart(&mut self) {
        let _ = self.inner.dispatch(GameAction::Restart);
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}

fn player_number(player: Player) -> u8 {
    player.index() as u8 + 1
}

fn cell(row: u8, col: u8) -> Option<Pos> {
    (row < crate::BOARD_SIZE && col < crate::BOARD_SIZE).then(|| Pos::from_row_col(row, col))
}

/// Serializable move for JavaScript
#[derive(serde::Serialize)]
struct WasmMove {
    to: [u8; 2],
    from: Option<[u8; 2]>,
    slot: Option<u8>,
}

impl From<Move> for WasmMove {
    fn from(mov: Move) -> Self {
        let to = [mov.to.row(), mov.to.col()];
        match mov.from {
            Location::Reserve(slot) => WasmMove {
                to,
                from: None,
                slot: Some(slot),
            },
            Location::Board(from) => WasmMove {
                to,
                from: Some([from.row(), from.col()]),
                slot: None,
            },
        }
    }
}
