//! Body Tetris (workspace facade crate).
//!
//! Re-exports the workspace crates as `body_tetris::{core,config,types}` while the
//! implementation lives in dedicated crates under `crates/`.

pub use body_tetris_config as config;
pub use body_tetris_core as core;
pub use body_tetris_types as types;
