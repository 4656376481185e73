//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: session state, keyboard event loop, mode cycling and playback
//! - **[`panes`]**: render functions for each visible pane (input, steps,
//!   history, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a
//! [`History`] and call [`App::run`] to start the event loop.
//!
//! [`History`]: crate::history::History
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
