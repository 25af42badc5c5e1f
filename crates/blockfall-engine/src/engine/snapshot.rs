use serde::Serialize;

use crate::core::{Coord, Grid, PieceGroup, PieceKind};

use super::{game_engine::EngineState, game_stats::GameStats};

/// Immutable copy of everything a renderer or report needs.
///
/// Taken in one piece by [`GameEngine::snapshot`](super::GameEngine::snapshot), so it never
/// shows a half-applied command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub grid: Grid,
    pub falling: PieceGroup,
    pub next: PieceKind,
    pub stats: GameStats,
    pub state: EngineState,
    pub tick_interval_ms: u64,
}

impl GameSnapshot {
    /// Falling cells that are inside the visible grid.
    pub fn visible_falling_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.falling.cells().iter().copied().filter(|cell| cell.row >= 0)
    }
}
