use std::time::Duration;

use blockfall_engine::{Command, EngineState, GameEngine};
use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};
use ratatui_runtime::{App, RenderMode, Runtime};

use crate::ui::widgets::{KeyBinding, KeyBindingDisplay, SessionDisplay};

const FPS: f64 = 60.0;

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Engine(Command),
    Quit,
}

impl Action {
    fn from_key(code: KeyCode) -> Option<Self> {
        let action = match code {
            KeyCode::Left => Action::Engine(Command::MoveLeft),
            KeyCode::Right => Action::Engine(Command::MoveRight),
            KeyCode::Up => Action::Engine(Command::Rotate),
            KeyCode::Down => Action::Engine(Command::SoftDrop),
            KeyCode::Char('p') => Action::Engine(Command::TogglePause),
            KeyCode::Char('r') => Action::Engine(Command::Restart),
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            _ => return None,
        };
        Some(action)
    }
}

const RUNNING_BINDINGS: &[KeyBinding] = &[
    (&["←", "→"], "Move"),
    (&["↑"], "Rotate"),
    (&["↓"], "Soft Drop"),
    (&["P"], "Pause"),
    (&["R"], "Restart"),
    (&["Q"], "Quit"),
];
const PAUSED_BINDINGS: &[KeyBinding] = &[
    (&["P"], "Resume"),
    (&["R"], "Restart"),
    (&["Q"], "Quit"),
];
const OVER_BINDINGS: &[KeyBinding] = &[(&["R"], "Restart"), (&["Q"], "Quit")];

/// Interactive front-end: one thread multiplexes the engine's tick timer with key input.
#[derive(Debug)]
pub struct PlayApp {
    engine: GameEngine,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(engine: GameEngine) -> Self {
        Self {
            engine,
            is_exiting: false,
        }
    }

    fn perform(&mut self, action: Action) {
        match action {
            Action::Engine(command) => _ = self.engine.apply(command),
            Action::Quit => self.is_exiting = true,
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_render_mode(RenderMode::throttled_from_rate(FPS));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn tick_interval(&self) -> Option<Duration> {
        self.engine.is_running().then(|| self.engine.tick_interval())
    }

    fn handle_event(&mut self, event: Event) {
        if let Some(key) = event.as_key_event()
            && key.kind == KeyEventKind::Press
            && let Some(action) = Action::from_key(key.code)
        {
            self.perform(action);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let snapshot = self.engine.snapshot();
        let session_display = SessionDisplay::new(&snapshot);
        let bindings = match snapshot.state {
            EngineState::Running => RUNNING_BINDINGS,
            EngineState::Paused => PAUSED_BINDINGS,
            EngineState::Over => OVER_BINDINGS,
        };

        let [main_area, help_area] = Layout::vertical([
            Constraint::Length(session_display.height()),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(KeyBindingDisplay::new(bindings), help_area);
    }

    fn update(&mut self) {
        self.engine.tick();
    }
}
