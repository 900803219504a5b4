//! Main TUI application state and logic

use crate::evaluator::engine::Evaluator;
use crate::evaluator::errors::EvalError;
use crate::parser::lexer::{Lexer, Token};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Trace,
    Tree,
    Tokens,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: source -> trace -> tree -> tokens)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Trace,
            FocusedPane::Trace => FocusedPane::Tree,
            FocusedPane::Tree => FocusedPane::Tokens,
            FocusedPane::Tokens => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Tokens,
            FocusedPane::Trace => FocusedPane::Source,
            FocusedPane::Tree => FocusedPane::Trace,
            FocusedPane::Tokens => FocusedPane::Tree,
        }
    }
}

/// The main application state
pub struct App {
    /// The evaluator whose history is being browsed
    pub evaluator: Evaluator,

    /// The expression text
    pub source_code: String,

    /// Token stream of `source_code`, scanned once up front
    pub tokens: Vec<Token>,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: usize,
    pub trace_scroll: usize,
    pub tree_scroll: usize,
    pub tokens_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    /// Create a new app with the given evaluator and source code
    pub fn new(evaluator: Evaluator, source_code: String) -> Self {
        let tokens = Lexer::new(&source_code).tokenize();
        let status_message = match evaluator.error() {
            Some(e) => format!("Evaluation stopped: {}", e),
            None => String::from("Ready!"),
        };

        App {
            evaluator,
            source_code,
            tokens,
            focused_pane: FocusedPane::Source,
            source_scroll: 0,
            trace_scroll: 0,
            tree_scroll: 0,
            tokens_scroll: 0,
            should_quit: false,
            status_message,
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Handle auto-play mode
            if self.is_playing && self.last_play_time.elapsed() >= Duration::from_secs(1) {
                if self.evaluator.step_forward().is_ok() {
                    self.status_message = "Playing...".to_string();
                    self.trace_scroll = usize::MAX;
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
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

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // 4 panes in 2 columns, plus status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let pane_area = main_chunks[0];
        let status_area = main_chunks[1];

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(pane_area);

        // Left column: Source (top) | Trace (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(columns[0]);

        // Right column: Tree (top) | Tokens (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[1]);

        let snapshot = self.evaluator.current_snapshot();
        let reduction = snapshot.and_then(|s| s.reduction.as_ref());
        let rendered = self.evaluator.rendered();
        let reduced = self.evaluator.reduced_values();
        let at_end = self.evaluator.is_at_end();

        super::panes::render_source_pane(
            frame,
            left_rows[0],
            &self.source_code,
            reduction.map(|r| r.span),
            &rendered,
            self.evaluator.result(),
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        super::panes::render_trace_pane(
            frame,
            left_rows[1],
            &self.evaluator.reductions(),
            self.evaluator.error().filter(|_| at_end),
            self.focused_pane == FocusedPane::Trace,
            &mut self.trace_scroll,
        );

        super::panes::render_tree_pane(
            frame,
            right_rows[0],
            self.evaluator.expr(),
            &reduced,
            reduction.map(|r| r.node),
            self.focused_pane == FocusedPane::Tree,
            &mut self.tree_scroll,
        );

        super::panes::render_tokens_pane(
            frame,
            right_rows[1],
            &self.tokens,
            self.focused_pane == FocusedPane::Tokens,
            &mut self.tokens_scroll,
        );

        super::panes::render_status_bar(
            frame,
            status_area,
            &self.status_message,
            self.evaluator.history_position(),
            self.evaluator.total_snapshots(),
            self.evaluator.error().is_some(),
            self.is_playing,
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1);
                let mut stepped = 0;
                for _ in 0..n {
                    if self.evaluator.step_forward().is_ok() {
                        stepped += 1;
                    } else {
                        break;
                    }
                }
                self.status_message = format!("Stepped forward {} step(s)", stepped);
                self.trace_scroll = usize::MAX;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Up => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_add(1);
            }
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(Duration::from_secs(1))
                            .unwrap_or(Instant::now());
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.evaluator.jump_to_end();
                self.status_message = "Jumped to end".to_string();
                self.trace_scroll = usize::MAX;
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                let _ = self.evaluator.rewind_to_start();
                self.status_message = "Jumped to start".to_string();
                self.trace_scroll = 0;
            }
            _ => {}
        }
    }

    fn focused_scroll(&mut self) -> &mut usize {
        match self.focused_pane {
            FocusedPane::Source => &mut self.source_scroll,
            FocusedPane::Trace => &mut self.trace_scroll,
            FocusedPane::Tree => &mut self.tree_scroll,
            FocusedPane::Tokens => &mut self.tokens_scroll,
        }
    }

    /// Step forward in history
    fn step_forward(&mut self) {
        match self.evaluator.step_forward() {
            Ok(()) => {
                self.status_message = "Stepped forward".to_string();
                self.trace_scroll = usize::MAX;
            }
            Err(EvalError::HistoryBoundary { message }) => {
                self.status_message = format!("Cannot step forward: {}", message);
            }
            Err(e) => {
                self.status_message = format!("Error: {}", e);
            }
        }
    }

    /// Step backward in history
    fn step_backward(&mut self) {
        match self.evaluator.step_backward() {
            Ok(()) => {
                self.status_message = "Stepped backward".to_string();
                self.trace_scroll = usize::MAX;
            }
            Err(EvalError::HistoryBoundary { message }) => {
                self.status_message = format!("Cannot step backward: {}", message);
            }
            Err(e) => {
                self.status_message = format!("Error: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::Parser;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;

    fn app(source: &str) -> App {
        let expr = Parser::new(source).parse().unwrap();
        let mut evaluator = Evaluator::new(expr, usize::MAX);
        let _ = evaluator.run();
        evaluator.rewind_to_start().unwrap();
        App::new(evaluator, source.to_string())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_step_keys() {
        let mut app = app("3 + 5 * 2");

        press(&mut app, KeyCode::Right);
        assert_eq!(app.evaluator.history_position(), 1);

        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.evaluator.history_position(), 0);
        assert!(app.status_message.starts_with("Cannot step backward"));

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.evaluator.result(), Some(13));

        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.status_message, "Stepped forward 2 step(s)");
    }

    #[test]
    fn test_focus_cycles() {
        let mut app = app("1");

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Trace);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focused_pane, FocusedPane::Tokens);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_render_shows_progress() {
        let mut app = app("3 + 5 * 2");

        let start = screen(&mut app);
        assert!(start.contains("Step 1/3"));
        assert!(start.contains("(nothing reduced yet)"));

        press(&mut app, KeyCode::Enter);
        let end = screen(&mut app);
        assert!(end.contains("Step 3/3"));
        assert!(end.contains("5 * 2 = 10"));
        assert!(end.contains("3 + 10 = 13"));
        assert!(end.contains("END_OF_INPUT"));
    }

    #[test]
    fn test_render_shows_error_at_end() {
        let expr = Parser::new("8 / (2 - 2)").parse().unwrap();
        let mut evaluator = Evaluator::new(expr, usize::MAX);
        assert!(evaluator.run().is_err());
        let mut app = App::new(evaluator, "8 / (2 - 2)".to_string());

        assert!(app.status_message.starts_with("Evaluation stopped"));
        let end = screen(&mut app);
        assert!(end.contains("error: Division by zero"));
    }
}
