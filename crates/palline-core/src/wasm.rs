//! WebAssembly bindings for the Palline game engine.
//!
//! This module exposes the turn engine to JavaScript through wasm-bindgen. Rich
//! values cross the boundary as JSON strings.

use wasm_bindgen::prelude::*;

use crate::actions::MoveRequest;
use crate::bot::{Bot, BotDifficulty};
use crate::game::TurnEngine;
use crate::grid::{Cell, Grid, Position};
use crate::movement::Axis;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn to_js_error(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn request(row: usize, col: usize, horizontal: bool, steps: i32) -> MoveRequest {
    let axis = if horizontal {
        Axis::Horizontal
    } else {
        Axis::Vertical
    };
    MoveRequest::new(Position::new(row, col), axis, steps)
}

fn rows_json(grid: &Grid) -> Option<String> {
    let rows: Vec<&[Cell]> = grid.rows().collect();
    serde_json::to_string(&rows).ok()
}

/// WASM-exposed game wrapper
#[wasm_bindgen]
pub struct WasmGame {
    engine: TurnEngine,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create an idle game with the specified number of players
    #[wasm_bindgen(constructor)]
    pub fn new(player_count: u8) -> Result<WasmGame, JsValue> {
        let engine = TurnEngine::new(player_count).map_err(to_js_error)?;
        Ok(WasmGame { engine })
    }

    #[wasm_bindgen(js_name = setPlayerCount)]
    pub fn set_player_count(&mut self, player_count: u8) -> Result<(), JsValue> {
        self.engine
            .set_player_count(player_count)
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = setPlayerName)]
    pub fn set_player_name(&mut self, player: u8, name: String) -> Result<(), JsValue> {
        self.engine
            .set_player_name(player, name)
            .map_err(to_js_error)
    }

    /// Start a new game, returns events JSON
    pub fn start(&mut self) -> Result<String, JsValue> {
        let events = self.engine.start().map_err(to_js_error)?;
        Ok(serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string()))
    }

    /// Abandon the current game, returns events JSON
    pub fn abandon(&mut self) -> Result<String, JsValue> {
        let events = self.engine.abandon().map_err(to_js_error)?;
        Ok(serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string()))
    }

    /// Board after a prospective move as JSON rows, or `null` if nothing would move
    #[wasm_bindgen(js_name = previewMove)]
    pub fn preview_move(&self, row: usize, col: usize, horizontal: bool, steps: i32) -> String {
        let result = self.engine.preview_move(&request(row, col, horizontal, steps));
        if !result.moved {
            return "null".to_string();
        }
        rows_json(&result.grid).unwrap_or_else(|| "null".to_string())
    }

    /// Play a move to completion, returns events JSON
    #[wasm_bindgen(js_name = attemptMove)]
    pub fn attempt_move(&mut self, row: usize, col: usize, horizontal: bool, steps: i32) -> String {
        let events = self
            .engine
            .attempt_move(request(row, col, horizontal, steps));
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
    }

    /// Commit a move but stay in the resolving phase so the UI can animate it
    #[wasm_bindgen(js_name = beginMove)]
    pub fn begin_move(&mut self, row: usize, col: usize, horizontal: bool, steps: i32) -> String {
        let events = self.engine.begin_move(request(row, col, horizontal, steps));
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
    }

    #[wasm_bindgen(js_name = finishMove)]
    pub fn finish_move(&mut self) -> bool {
        self.engine.finish_move()
    }

    /// Get the current game state as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(self.engine.state()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Get the board as JSON rows (for rendering)
    #[wasm_bindgen(js_name = getGrid)]
    pub fn get_grid(&self) -> String {
        rows_json(self.engine.grid()).unwrap_or_else(|| "[]".to_string())
    }

    /// Get the current phase as JSON
    #[wasm_bindgen(js_name = getPhase)]
    pub fn get_phase(&self) -> String {
        serde_json::to_string(self.engine.phase()).unwrap_or_else(|_| "\"Unknown\"".to_string())
    }

    #[wasm_bindgen(js_name = getCurrentPlayer)]
    pub fn get_current_player(&self) -> u8 {
        self.engine.current_player()
    }

    #[wasm_bindgen(js_name = getPlayers)]
    pub fn get_players(&self) -> String {
        serde_json::to_string(self.engine.players()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Final result as JSON, or `null` while the game is running
    #[wasm_bindgen(js_name = getOutcome)]
    pub fn get_outcome(&self) -> String {
        match self.engine.state().get_outcome() {
            Some(outcome) => serde_json::to_string(outcome).unwrap_or_else(|_| "null".to_string()),
            None => "null".to_string(),
        }
    }

    /// Winner id, or 0 for a tie or a game still running
    #[wasm_bindgen(js_name = getWinner)]
    pub fn get_winner(&self) -> u8 {
        self.engine
            .state()
            .get_outcome()
            .map(|outcome| outcome.winner_id())
            .unwrap_or(crate::player::NO_PLAYER)
    }

    /// Get a bot's suggested move for the current player
    /// difficulty: "Easy", "Medium", or "Hard"
    #[wasm_bindgen(js_name = getBotMove)]
    pub fn get_bot_move(&self, difficulty: &str) -> String {
        let diff = match difficulty {
            "Easy" => BotDifficulty::Easy,
            "Medium" => BotDifficulty::Medium,
            "Hard" => BotDifficulty::Hard,
            _ => BotDifficulty::Medium,
        };

        let mut bot = Bot::new(self.engine.current_player(), diff);
        match bot.choose_move(self.engine.state()) {
            Some(request) => serde_json::to_string(&request).unwrap_or_else(|_| "null".to_string()),
            None => "null".to_string(),
        }
    }
}
