//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`input`]: Request line with the mode tabs
//! - [`steps`]: Trace of the selected entry with expression highlighting
//! - [`history`]: Computed requests, newest last
//! - [`status`]: Status bar with keybindings and playback state
//!
//! Each pane module exports a `render_*` function that draws into the given
//! area and keeps no state of its own besides the scroll offsets it is handed.

pub mod history;
pub mod input;
pub mod status;
pub mod steps;

pub use history::render_history_pane;
pub use input::render_input_pane;
pub use status::render_status_bar;
pub use steps::{highlight_step, render_steps_pane};
