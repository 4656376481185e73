//! Main TUI application state and logic

use crate::history::{History, HistoryEntry, Mode};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Delay between two steps while auto-playing
const PLAY_INTERVAL: Duration = Duration::from_millis(800);

/// The main application state
pub struct App {
    /// Computed requests; the session owns the only copy
    pub history: History,

    /// Mode the next request is computed in
    pub mode: Mode,

    /// Text of the request being typed
    pub input: String,

    /// History entry shown in the steps pane
    pub selected: Option<usize>,

    /// Index into the selected entry's steps
    pub current_step: usize,

    /// Whether ↑/↓ moved the focus to the history pane
    pub browsing_history: bool,

    /// Per-pane scroll offsets
    pub steps_scroll: usize,
    pub history_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,
}

impl App {
    /// Create a new app around an existing history
    pub fn new(history: History) -> Self {
        App {
            history,
            mode: Mode::Expression,
            input: String::new(),
            selected: None,
            current_step: 0,
            browsing_history: false,
            steps_scroll: 0,
            history_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
            is_playing: false,
            last_play_time: Instant::now(),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= PLAY_INTERVAL {
                self.tick();
            }

            // Poll with a timeout so auto-play keeps advancing
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Entry shown in the steps pane
    pub fn current_entry(&self) -> Option<&HistoryEntry> {
        self.selected.and_then(|idx| self.history.get(idx))
    }

    fn total_steps(&self) -> usize {
        self.current_entry().map_or(0, |entry| entry.steps.len())
    }

    fn last_step(&self) -> usize {
        self.total_steps().saturating_sub(1)
    }

    /// Advance auto-play by one step
    pub fn tick(&mut self) {
        if self.current_step < self.last_step() {
            self.current_step += 1;
            self.status_message = "Playing...".to_string();
        } else {
            self.is_playing = false;
            self.status_message = "Playback complete".to_string();
        }
        self.last_play_time = Instant::now();
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Input line, panes, status bar
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(size);

        // Steps (left) | History (right)
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(main_chunks[1]);

        super::panes::render_input_pane(frame, main_chunks[0], self.mode, &self.input);

        let selected = self.selected.and_then(|idx| self.history.get(idx));
        super::panes::render_steps_pane(
            frame,
            columns[0],
            selected,
            self.current_step,
            !self.browsing_history,
            &mut self.steps_scroll,
        );

        super::panes::render_history_pane(
            frame,
            columns[1],
            &self.history,
            self.selected,
            self.browsing_history,
            &mut self.history_scroll,
        );

        let is_error = selected.is_some_and(HistoryEntry::is_error);
        super::panes::render_status_bar(
            frame,
            main_chunks[2],
            &self.status_message,
            self.current_step,
            selected.map_or(0, |entry| entry.steps.len()),
            is_error,
            self.is_playing,
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.mode = self.mode.next();
                self.status_message = format!("{} mode", self.mode);
            }
            KeyCode::BackTab => {
                self.mode = self.mode.previous();
                self.status_message = format!("{} mode", self.mode);
            }
            KeyCode::Enter => self.compute(),
            KeyCode::Left => {
                self.is_playing = false;
                self.browsing_history = false;
                self.step_backward();
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.browsing_history = false;
                self.step_forward();
            }
            KeyCode::Home => {
                self.is_playing = false;
                self.current_step = 0;
                self.status_message = "Jumped to first step".to_string();
            }
            KeyCode::End => {
                self.is_playing = false;
                self.current_step = self.last_step();
                self.status_message = "Jumped to last step".to_string();
            }
            KeyCode::Up => self.browse(-1),
            KeyCode::Down => self.browse(1),
            // Space toggles playback once the input line is empty
            KeyCode::Char(' ') if self.input.is_empty() => self.toggle_play(),
            KeyCode::Char(c) => {
                self.browsing_history = false;
                self.input.push(c);
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            _ => {}
        }
    }

    /// Compute the typed request and show its trace
    fn compute(&mut self) {
        self.is_playing = false;
        self.browsing_history = false;
        if self.input.trim().is_empty() {
            self.status_message = "Nothing to compute".to_string();
            return;
        }

        let entry = HistoryEntry::compute(self.mode, &self.input);
        self.status_message = match &entry.outcome {
            Ok(answer) => format!("= {}", answer),
            Err(err) => format!("{}: {}", err.category(), err),
        };
        self.history.push(entry);
        self.input.clear();
        self.selected = Some(self.history.len() - 1);
        self.current_step = self.last_step();
    }

    fn toggle_play(&mut self) {
        if self.current_entry().is_none() {
            return;
        }
        self.is_playing = !self.is_playing;
        if self.is_playing {
            if self.current_step >= self.last_step() {
                self.current_step = 0;
            }
            self.last_play_time = Instant::now();
            self.status_message = "Playing...".to_string();
        } else {
            self.status_message = "Paused".to_string();
        }
    }

    /// Move the history selection by `delta` and recall that entry's input
    fn browse(&mut self, delta: isize) {
        if self.history.is_empty() {
            return;
        }
        self.is_playing = false;
        self.browsing_history = true;
        let last = self.history.len() - 1;
        let target = match self.selected {
            Some(idx) => idx.saturating_add_signed(delta).min(last),
            None => last,
        };
        self.selected = Some(target);
        self.current_step = self.last_step();
        if let Some(entry) = self.history.get(target) {
            self.mode = entry.mode;
            self.input = entry.input.clone();
            self.status_message = format!("History {}/{}", target + 1, self.history.len());
        }
    }

    fn step_forward(&mut self) {
        if self.current_step < self.last_step() {
            self.current_step += 1;
            self.status_message = "Stepped forward".to_string();
        } else {
            self.status_message = "Cannot step forward: at the last step".to_string();
        }
    }

    fn step_backward(&mut self) {
        if self.current_step > 0 {
            self.current_step -= 1;
            self.status_message = "Stepped backward".to_string();
        } else {
            self.status_message = "Cannot step backward: at the first step".to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_enter_computes_and_shows_last_step() {
        let mut app = App::new(History::new(10));
        type_text(&mut app, "2+3*4");
        press(&mut app, KeyCode::Enter);

        assert!(app.input.is_empty());
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.current_step, 2);
        assert_eq!(app.status_message, "= 14");
    }

    #[test]
    fn test_stepping_is_clamped() {
        let mut app = App::new(History::new(10));
        type_text(&mut app, "2+3*4");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Right);
        assert_eq!(app.current_step, 2);
        press(&mut app, KeyCode::Home);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.current_step, 0);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.current_step, 1);
        press(&mut app, KeyCode::End);
        assert_eq!(app.current_step, 2);
    }

    #[test]
    fn test_space_plays_only_with_empty_input() {
        let mut app = App::new(History::new(10));
        type_text(&mut app, "{1} u {2}");
        assert_eq!(app.input, "{1} u {2}");
        assert!(!app.is_playing);

        app.mode = Mode::Set;
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.is_playing);
        assert_eq!(app.current_step, 0);
        app.tick();
        assert_eq!(app.current_step, 1);
        app.tick();
        assert!(!app.is_playing);
    }

    #[test]
    fn test_tab_cycles_modes() {
        let mut app = App::new(History::new(10));
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.mode, Mode::System);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.mode, Mode::Set);
    }

    #[test]
    fn test_history_browsing_recalls_input() {
        let mut app = App::new(History::new(10));
        type_text(&mut app, "1+1");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "x+y=3;x-y=1");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected, Some(0));
        assert_eq!(app.input, "1+1");
        assert_eq!(app.mode, Mode::Expression);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected, Some(0));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.mode, Mode::System);
    }

    #[test]
    fn test_escape_quits() {
        let mut app = App::new(History::new(10));
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }
}
