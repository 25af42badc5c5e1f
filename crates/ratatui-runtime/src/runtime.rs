use std::{io, time::Instant};

use crate::{
    App,
    event::TuiEvent,
    event_loop::{EventLoop, RenderMode},
};

/// TUI application runtime.
///
/// Manages the event loop and executes applications that implement the `App` trait.
#[derive(Debug)]
pub struct Runtime {
    events: EventLoop,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// Creates a new Runtime.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: EventLoop::new(Instant::now()),
        }
    }

    /// Sets the render mode.
    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.events.set_render_mode(mode);
    }

    /// Runs the application.
    ///
    /// 1. Calls `app.init()` for initialization
    /// 2. Runs the event loop until `app.should_exit()` returns true
    ///    - tick: calls `app.update()`
    ///    - render: calls `app.draw()`
    ///    - crossterm event: calls `app.handle_event()`
    ///
    /// The tick interval is re-read from `app.tick_interval()` after every call that can change
    /// application state.
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        app.init(&mut self);
        self.sync_tick_interval(app);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick => {
                        app.update();
                        self.sync_tick_interval(app);
                    }
                    TuiEvent::Render => {
                        terminal.draw(|f| app.draw(f))?;
                    }
                    TuiEvent::Crossterm(event) => {
                        app.handle_event(event);
                        self.sync_tick_interval(app);
                    }
                }
            }
            Ok(())
        })
    }

    fn sync_tick_interval<A>(&mut self, app: &A)
    where
        A: App,
    {
        self.events.set_tick_interval(app.tick_interval(), Instant::now());
    }
}
