use std::{mem, time::Duration};

use serde::Serialize;

use crate::{
    ConfigError,
    core::{Coord, Grid, LockOutcome, PieceGroup, PieceKind, can_place, is_supported},
};

use super::{
    command::{Command, CommandOutcome},
    config::EngineConfig,
    game_stats::GameStats,
    piece_generator::PieceGenerator,
    snapshot::GameSnapshot,
};

/// Lifecycle of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
pub enum EngineState {
    /// Ticks and movement commands take effect.
    Running,
    /// Only `start`, `toggle_pause` and `restart` take effect.
    Paused,
    /// A piece locked above the grid. Terminal until restart.
    Over,
}

/// What a call to [`GameEngine::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TickOutcome {
    /// The engine is paused or over.
    Idle,
    /// The falling piece moved down one row.
    Fell,
    /// The piece cannot move down but rests on nothing; it stays put.
    Blocked,
    /// The piece locked, rows were cleared and a new piece spawned.
    Locked { cleared_lines: usize },
    /// The piece locked while above the grid; the game is over.
    ToppedOut,
}

/// The game state machine.
///
/// Owns the grid, the falling piece and a scratch piece used to probe every move before it is
/// committed. Every command is a no-op unless the engine is [`EngineState::Running`]; illegal
/// moves are silently rejected.
#[derive(Debug, Clone)]
pub struct GameEngine {
    config: EngineConfig,
    grid: Grid,
    falling: PieceGroup,
    scratch: PieceGroup,
    generator: PieceGenerator,
    stats: GameStats,
    state: EngineState,
    soft_dropping: bool,
}

impl GameEngine {
    /// Creates a running engine with an empty grid and a randomly seeded generator.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_generator(config, PieceGenerator::new())
    }

    /// Like [`Self::new`], but draws pieces from `generator`.
    pub fn with_generator(
        config: EngineConfig,
        mut generator: PieceGenerator,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::new(config.width, config.height);
        let falling = PieceGroup::spawn(generator.pop_next(), config.width);
        Ok(Self {
            config,
            grid,
            falling,
            scratch: falling,
            generator,
            stats: GameStats::new(),
            state: EngineState::Running,
            soft_dropping: false,
        })
    }

    /// Starts a new game with the same configuration and generator.
    pub fn restart(&mut self) {
        self.grid.reset();
        self.stats = GameStats::new();
        self.state = EngineState::Running;
        self.soft_dropping = false;
        self.respawn();
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn falling_piece(&self) -> &PieceGroup {
        &self.falling
    }

    /// Cells of the falling piece, including any still above the grid.
    pub fn falling_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.falling.cells().iter().copied()
    }

    pub fn occupied_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.grid.occupied_cells()
    }

    #[must_use]
    pub fn next_piece(&self) -> PieceKind {
        self.generator.peek_next()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.stats.score()
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// How long the scheduler should wait before the next [`Self::tick`].
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms())
    }

    fn tick_interval_ms(&self) -> u64 {
        if self.soft_dropping {
            self.config.quick_interval_ms
        } else {
            self.config.normal_interval_ms
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            grid: self.grid.clone(),
            falling: self.falling,
            next: self.generator.peek_next(),
            stats: self.stats.clone(),
            state: self.state,
            tick_interval_ms: self.tick_interval_ms(),
        }
    }

    /// Resumes a paused game. Has no effect once the game is over.
    pub fn start(&mut self) {
        if self.state.is_paused() {
            self.state = EngineState::Running;
        }
    }

    pub fn pause(&mut self) {
        if self.state.is_running() {
            self.state = EngineState::Paused;
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            EngineState::Running => self.pause(),
            EngineState::Paused => self.start(),
            EngineState::Over => {}
        }
    }

    pub fn move_left(&mut self) -> bool {
        self.try_transform(|group| group.translate(-1, 0))
    }

    pub fn move_right(&mut self) -> bool {
        self.try_transform(|group| group.translate(1, 0))
    }

    pub fn rotate(&mut self) -> bool {
        self.try_transform(PieceGroup::rotate)
    }

    /// Switches to the quick tick interval until the falling piece locks.
    pub fn soft_drop(&mut self) {
        if self.state.is_running() {
            self.soft_dropping = true;
        }
    }

    /// Applies one gravity step.
    ///
    /// The piece moves down if it can. Otherwise, if it rests on the floor or a locked cell, it
    /// is locked: a lock above the grid ends the game, any other lock clears full rows, scores
    /// them and spawns the next piece. A piece that is blocked but unsupported stays put.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_running() {
            return TickOutcome::Idle;
        }
        if self.try_transform(|group| group.translate(0, 1)) {
            return TickOutcome::Fell;
        }
        if !is_supported(&self.falling, &self.grid) {
            return TickOutcome::Blocked;
        }

        self.soft_dropping = false;
        match self.grid.lock(&self.falling) {
            LockOutcome::ToppedOut => {
                self.state = EngineState::Over;
                TickOutcome::ToppedOut
            }
            LockOutcome::Locked => {
                let cleared_lines = self.grid.clear_full_rows();
                self.stats.record_lock(cleared_lines, self.config.line_bonus);
                self.respawn();
                TickOutcome::Locked { cleared_lines }
            }
        }
    }

    /// Dispatches `command` to the matching method.
    pub fn apply(&mut self, command: Command) -> CommandOutcome {
        match command {
            Command::Start => self.start(),
            Command::Pause => self.pause(),
            Command::TogglePause => self.toggle_pause(),
            Command::MoveLeft => return CommandOutcome::Moved(self.move_left()),
            Command::MoveRight => return CommandOutcome::Moved(self.move_right()),
            Command::Rotate => return CommandOutcome::Moved(self.rotate()),
            Command::SoftDrop => self.soft_drop(),
            Command::Tick => return CommandOutcome::Ticked(self.tick()),
            Command::Restart => self.restart(),
        }
        CommandOutcome::Done
    }

    /// Copies the falling piece into the scratch piece, transforms it and commits it if the
    /// result is placeable.
    fn try_transform(&mut self, transform: impl FnOnce(&mut PieceGroup)) -> bool {
        if !self.state.is_running() {
            return false;
        }
        self.scratch.copy_from(&self.falling);
        transform(&mut self.scratch);
        if !can_place(&self.scratch, &self.grid) {
            return false;
        }
        mem::swap(&mut self.falling, &mut self.scratch);
        true
    }

    fn respawn(&mut self) {
        let kind = self.generator.pop_next();
        self.falling.reset(kind, self.config.width);
    }
}
