//! Palline - a turn-based ball-pushing match game engine
//!
//! This crate provides the core game logic for Palline, including:
//! - Board generation with balanced colors and no same-colored neighbors
//! - The train-push move simulator
//! - Connected-group match detection
//! - Scoring, end-of-game sweep and tie resolution
//! - The turn engine state machine
//!
//! # Architecture
//!
//! The game engine is platform-agnostic and has no rendering, input or audio.
//! It can be compiled to:
//! - Native Rust for headless play and simulation
//! - WebAssembly for a browser front end (`wasm` feature)
//!
//! # Modules
//!
//! - [`grid`]: Colors, cells, positions and the board
//! - [`generator`]: Initial board generation
//! - [`movement`]: Pushing trains of balls
//! - [`matching`]: Finding connected same-color groups
//! - [`scoring`]: Points and final results
//! - [`game`]: Game state machine

pub mod actions;
pub mod bot;
pub mod game;
pub mod generator;
pub mod grid;
pub mod matching;
pub mod movement;
pub mod player;
pub mod scoring;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{EndReason, GameEvent, MoveRequest, RejectReason};
pub use bot::{Bot, BotDifficulty};
pub use game::{end_condition, resolve_move, GameError, GamePhase, GameState, ResolvedMove, TurnEngine};
pub use generator::{generate, generate_with_report, generate_with_rng, GenerationReport};
pub use grid::{BallColor, Cell, CellId, Grid, Position, GRID_SIZE, MIN_GROUP_SIZE};
pub use matching::{connected_group, find_matches};
pub use movement::{legal_moves, simulate, Axis, MoveResult};
pub use player::{Player, PlayerId, NO_PLAYER};
pub use scoring::GameOutcome;
