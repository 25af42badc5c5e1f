use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::event::TuiEvent;

/// Rendering trigger mode.
#[derive(Debug, Clone, Copy, Default)]
pub enum RenderMode {
    /// Render at fixed intervals.
    Interval(Duration),
    /// Render after state changes (tick or crossterm event).
    #[default]
    OnDirty,
    /// Render after state changes, but with minimum interval between renders.
    ///
    /// If events occur faster than the interval, they are batched into one render.
    Throttled(Duration),
}

impl RenderMode {
    /// Creates `Throttled` mode from frame rate (FPS).
    #[must_use]
    pub fn throttled_from_rate(rate: f64) -> Self {
        Self::Throttled(Duration::from_secs_f64(1.0 / rate))
    }
}

/// Event loop state management.
///
/// Tracks when the last tick and render happened and returns the next event via `next()`.
/// While the tick interval is `None`, no tick events are generated.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    render_mode: RenderMode,
    last_tick: Instant,
    last_render: Instant,
    dirty: bool,
}

impl EventLoop {
    pub(super) fn new(now: Instant) -> Self {
        let past_time = now.checked_sub(Duration::from_secs(86400)).unwrap_or(now);
        Self {
            tick_interval: None,
            render_mode: RenderMode::default(),
            last_tick: now,
            last_render: past_time,
            dirty: true, // Initial render is required on startup
        }
    }

    /// Sets the tick interval.
    ///
    /// The next tick is due one new interval after the previous tick, so shortening the
    /// interval takes effect immediately. Re-enabling ticks after `None` restarts the period
    /// from `now` instead of firing a tick for the time spent disabled.
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>, now: Instant) {
        if self.tick_interval.is_none() && interval.is_some() {
            self.last_tick = now;
        }
        self.tick_interval = interval;
    }

    pub(super) fn set_render_mode(&mut self, render_mode: RenderMode) {
        self.render_mode = render_mode;
    }

    /// Returns the next event.
    ///
    /// Blocks until a tick/render time is reached or a crossterm event occurs.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(event) = self.due_event(now) {
                return Ok(event);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    /// Returns the timer event that is due at `now`, ticks first, and records it.
    fn due_event(&mut self, now: Instant) -> Option<TuiEvent> {
        if let Some(tick_interval) = self.tick_interval
            && now.duration_since(self.last_tick) >= tick_interval
        {
            self.last_tick = now;
            self.dirty = true;
            return Some(TuiEvent::Tick);
        }

        let do_render = match self.render_mode {
            RenderMode::Interval(interval) => now.duration_since(self.last_render) >= interval,
            RenderMode::OnDirty => self.dirty,
            RenderMode::Throttled(interval) => {
                self.dirty && now.duration_since(self.last_render) >= interval
            }
        };
        if do_render {
            self.last_render = now;
            self.dirty = false;
            return Some(TuiEvent::Render);
        }
        None
    }

    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self.tick_interval.map(|interval| self.last_tick + interval);
        let next_render_at = match self.render_mode {
            RenderMode::Interval(interval) => Some(self.last_render + interval),
            RenderMode::OnDirty => self.dirty.then_some(now),
            RenderMode::Throttled(interval) => self.dirty.then(|| self.last_render + interval),
        };
        let next_timeout_at = [next_tick_at, next_render_at].into_iter().flatten().min()?;
        Some(next_timeout_at.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    /// Event loop with the startup render already consumed.
    fn rendered_loop(start: Instant) -> EventLoop {
        let mut events = EventLoop::new(start);
        assert!(events.due_event(start).unwrap().is_render());
        events
    }

    #[test]
    fn test_initial_render_without_ticks() {
        let start = Instant::now();
        let mut events = EventLoop::new(start);
        assert!(events.due_event(start).unwrap().is_render());
        assert!(events.due_event(start + 1000 * MS).is_none());
        assert_eq!(events.compute_timeout(start), None);
    }

    #[test]
    fn test_tick_fires_after_interval() {
        let start = Instant::now();
        let mut events = rendered_loop(start);
        events.set_tick_interval(Some(500 * MS), start);

        assert!(events.due_event(start + 499 * MS).is_none());
        assert_eq!(events.compute_timeout(start + 200 * MS), Some(300 * MS));
        assert!(events.due_event(start + 500 * MS).unwrap().is_tick());
        assert!(events.due_event(start + 500 * MS).unwrap().is_render());
        assert!(events.due_event(start + 500 * MS).is_none());
    }

    #[test]
    fn test_shorter_interval_applies_to_pending_tick() {
        let start = Instant::now();
        let mut events = rendered_loop(start);
        events.set_tick_interval(Some(500 * MS), start);
        events.set_tick_interval(Some(50 * MS), start + 20 * MS);

        assert_eq!(events.compute_timeout(start + 20 * MS), Some(30 * MS));
        assert!(events.due_event(start + 50 * MS).unwrap().is_tick());
    }

    #[test]
    fn test_disabled_ticks_do_not_accumulate() {
        let start = Instant::now();
        let mut events = rendered_loop(start);
        events.set_tick_interval(Some(100 * MS), start);
        events.set_tick_interval(None, start + 10 * MS);
        assert!(events.due_event(start + 1000 * MS).is_none());

        events.set_tick_interval(Some(100 * MS), start + 1000 * MS);
        assert!(events.due_event(start + 1050 * MS).is_none());
        assert!(events.due_event(start + 1100 * MS).unwrap().is_tick());
    }

    #[test]
    fn test_throttled_render_waits_for_interval() {
        let start = Instant::now();
        let mut events = rendered_loop(start);
        events.set_render_mode(RenderMode::Throttled(16 * MS));
        events.dirty = true;

        assert!(events.due_event(start + 10 * MS).is_none());
        assert_eq!(events.compute_timeout(start + 10 * MS), Some(6 * MS));
        assert!(events.due_event(start + 16 * MS).unwrap().is_render());
    }

    #[test]
    fn test_throttled_from_rate() {
        let RenderMode::Throttled(interval) = RenderMode::throttled_from_rate(50.0) else {
            panic!("expected throttled mode");
        };
        assert_eq!(interval, 20 * MS);
    }
}
