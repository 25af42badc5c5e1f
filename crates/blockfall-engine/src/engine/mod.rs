//! Game engine logic and state management.
//!
//! This module drives the core data structures through a game:
//!
//! - [`GameEngine`] - Grid, falling piece and the tick/command state machine
//! - [`EngineConfig`] - Grid size, tick intervals and line bonus, fixed at construction
//! - [`GameStats`] - Score, cleared lines and locked piece counters
//! - [`PieceGenerator`] - Random (seeded) or constant piece selection
//! - [`GameSnapshot`] - Immutable copy of everything a renderer needs
//! - [`SharedEngine`] - Mutex-serialized handle for multi-threaded drivers
//!
//! # Game Flow
//!
//! 1. Construct a [`GameEngine`] from an [`EngineConfig`]
//! 2. An external scheduler calls [`GameEngine::tick`] every [`GameEngine::tick_interval`]
//! 3. Input calls the movement commands in between ticks
//! 4. When the falling piece lands it is locked, full rows are cleared and a new piece spawns
//! 5. Repeat until a piece locks while still above the grid
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{EngineConfig, GameEngine, PieceGenerator, PieceKind};
//!
//! let config = EngineConfig::default();
//! let mut engine = GameEngine::with_generator(config, PieceGenerator::constant(PieceKind::O))?;
//!
//! engine.move_left();
//! while engine.tick().is_fell() {}
//!
//! assert_eq!(engine.stats().completed_pieces(), 1);
//! assert!(engine.is_running());
//! # Ok::<(), blockfall_engine::ConfigError>(())
//! ```

pub use self::{
    command::*, config::*, game_engine::*, game_stats::*, piece_generator::*, shared::*,
    snapshot::*,
};

mod command;
mod config;
mod game_engine;
mod game_stats;
mod piece_generator;
mod shared;
mod snapshot;
