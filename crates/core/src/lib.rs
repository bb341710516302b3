//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the grid, the body-matching engine, the cascade and the
//! piece generator. It has **zero dependencies** on rendering, input, or I/O:
//!
//! - **Deterministic**: Same seed produces identical games
//! - **Testable**: Every rule is reachable without a frame loop
//! - **Portable**: Can run in any environment (terminal, GUI, headless)
//!
//! # Module Structure
//!
//! - [`geometry`]: rotation tables, bounds and overlap predicates
//! - [`piece`]: a placed or falling piece
//! - [`grid`]: occupancy, the ordered locked list, collision and compaction
//! - [`body`]: body templates, the catalog and template matching
//! - [`cascade`]: match/remove/compact rounds and bomb detonation
//! - [`rng`]: weighted random piece generation
//! - [`game_state`]: the piece life cycle of one game
//!
//! # Game Rules
//!
//! - **Bodies**: Locked pieces that form a complete body template (in any of
//!   the four orientations) are removed and score the body's value
//! - **Cascade**: After removal the grid compacts; fallen pieces are matched again
//! - **Bombs**: A landing bomb destroys the pieces directly beneath it, unscored
//!
//! # Example
//!
//! ```
//! use body_tetris_core::GameState;
//! use body_tetris_types::GameAction;
//!
//! // Create and start a game
//! let mut game = GameState::default();
//! game.start();
//!
//! // Apply game actions
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::Rotate);
//! game.apply_action(GameAction::HardDrop);
//!
//! assert_eq!(game.pieces_landed(), 1);
//! ```
//!
//! # Timing
//!
//! The core has no clock. Call [`GameState::tick`](game_state::GameState::tick)
//! once per gravity step; how often is up to the frame loop.

pub mod body;
pub mod cascade;
pub mod game_state;
pub mod geometry;
pub mod grid;
pub mod piece;
pub mod rng;

pub use body_tetris_types as types;

// Re-export commonly used types for convenience
pub use body::{BodyCatalog, BodyPiece, BodyTemplate, CatalogError};
pub use cascade::{detonate_bomb, join_and_score_pieces, pieces_below, BodyMatch, BombReport, CascadeReport};
pub use game_state::{GameState, LandingEvent, LandingOutcome};
pub use grid::{Grid, PieceId};
pub use piece::Piece;
pub use rng::{PieceGenerator, SimpleRng, SpawnWeights};
