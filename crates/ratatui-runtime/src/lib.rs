//! Minimal terminal event loop for ratatui applications.
//!
//! The [`Runtime`] multiplexes three event sources into one thread: a tick timer whose period the
//! application may change at any time, render timing chosen by [`RenderMode`], and crossterm
//! input. Applications implement [`App`].

pub use self::{app::App, event_loop::RenderMode, runtime::Runtime};

mod app;
mod event;
mod event_loop;
mod runtime;
