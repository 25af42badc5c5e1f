use serde::{Deserialize, Serialize};

use super::game_engine::TickOutcome;

/// A request to the engine, as produced by input handling or a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    #[display("start")]
    Start,
    #[display("pause")]
    Pause,
    #[display("toggle pause")]
    TogglePause,
    #[display("move left")]
    MoveLeft,
    #[display("move right")]
    MoveRight,
    #[display("rotate")]
    Rotate,
    #[display("soft drop")]
    SoftDrop,
    #[display("tick")]
    Tick,
    #[display("restart")]
    Restart,
}

/// What [`GameEngine::apply`](super::GameEngine::apply) did with a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum CommandOutcome {
    /// A lifecycle or interval command was handled.
    Done,
    /// A move or rotation; `true` if the falling piece changed.
    Moved(bool),
    /// A gravity step.
    Ticked(TickOutcome),
}
