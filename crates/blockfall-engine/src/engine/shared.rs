use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use super::{
    command::{Command, CommandOutcome},
    game_engine::GameEngine,
    snapshot::GameSnapshot,
};

/// A [`GameEngine`] shared between threads.
///
/// Every call takes the lock for its whole duration, so commands from an input thread and
/// ticks from a timer thread are applied one at a time and readers always see a state between
/// two commands.
///
/// ```
/// use std::thread;
///
/// use blockfall_engine::{Command, EngineConfig, GameEngine, SharedEngine};
///
/// let shared = SharedEngine::new(GameEngine::new(EngineConfig::default())?);
/// let input = {
///     let shared = shared.clone();
///     thread::spawn(move || shared.apply(Command::MoveLeft))
/// };
/// shared.apply(Command::Tick);
/// input.join().unwrap();
/// assert!(!shared.is_over());
/// # Ok::<(), blockfall_engine::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<GameEngine>>,
}

impl SharedEngine {
    #[must_use]
    pub fn new(engine: GameEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    pub fn apply(&self, command: Command) -> CommandOutcome {
        self.lock().apply(command)
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        self.lock().snapshot()
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.lock().tick_interval()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.lock().is_over()
    }

    /// Runs `f` with exclusive access to the engine.
    ///
    /// If `f` panics, the engine keeps the state left by the engine calls `f` completed.
    pub fn with_engine<T>(&self, f: impl FnOnce(&mut GameEngine) -> T) -> T {
        f(&mut self.lock())
    }

    // Engine methods do not panic, so a poisoned lock means a `with_engine` closure panicked
    // between two complete engine calls. The engine is consistent there; keep serving it.
    fn lock(&self) -> MutexGuard<'_, GameEngine> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
