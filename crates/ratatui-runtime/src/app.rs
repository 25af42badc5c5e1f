use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;

use crate::Runtime;

/// Trait for TUI applications.
///
/// Applications executed by `Runtime::run()` must implement this trait.
pub trait App {
    /// Initializes the application.
    ///
    /// Called at the start of `Runtime::run()`. Use this to configure the render mode.
    fn init(&mut self, runtime: &mut Runtime);

    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Returns how long to wait between two `update()` calls, or `None` to stop ticking.
    ///
    /// Queried after `init()`, after every `update()` and after every `handle_event()`, so a
    /// change takes effect before the next tick is scheduled.
    fn tick_interval(&self) -> Option<Duration>;

    /// Handles terminal events (key input, mouse, resize, etc.).
    fn handle_event(&mut self, event: Event);

    /// Draws the screen (called on each render event).
    fn draw(&self, frame: &mut Frame);

    /// Advances the application by one tick.
    fn update(&mut self);
}
