//! Main application state and TUI event loop for brandboard.
//!
//! [`App`] owns the theme, the current screen, and the per-session context.
//! Every interaction that changes a selection or installs a dataset triggers
//! one full synchronous recompute of the dashboard snapshot; there is no
//! background work.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use tracing::debug;

use board_core::models::Dataset;
use board_data::loader;
use board_runtime::pipeline::{self, Dashboard};
use board_runtime::session::Session;

use crate::dashboard_view::{self, DashboardViewData};
use crate::entry_view::{self, EntryViewData, InputMode};
use crate::gate_view;
use crate::themes::Theme;

// ── Screen ────────────────────────────────────────────────────────────────────

/// Which screen the TUI is currently rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Access-code gate.
    Gate,
    /// File-pick / paste data entry.
    DataEntry,
    /// The analysis dashboard.
    Dashboard,
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the brandboard TUI.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    /// Current screen.
    pub screen: Screen,
    /// Per-session context (gate state, dataset, selections).
    pub session: Session,
    /// Directory scanned for data files.
    pub data_dir: PathBuf,
    /// Data-entry input mode.
    pub input_mode: InputMode,
    /// Discovered data files, sorted.
    pub files: Vec<PathBuf>,
    /// Index of the highlighted file.
    pub selected_file: usize,
    /// In-progress paste buffer.
    pub paste_buffer: String,
    /// In-progress access-code entry.
    pub code_buffer: String,
    /// Inline message from the last failed action.
    pub flash: Option<String>,
    /// Most recent dashboard snapshot, `None` until data is installed.
    pub dashboard: Option<Dashboard>,
    /// Whether the bottom table shows the raw-data preview.
    pub show_raw: bool,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    /// Construct a new application, scanning `data_dir` for loadable files.
    pub fn new(theme_name: &str, session: Session, data_dir: PathBuf) -> Self {
        let files = loader::find_data_files(&data_dir);
        Self {
            theme: Theme::from_name(theme_name),
            screen: Screen::Gate,
            session,
            data_dir,
            input_mode: InputMode::Files,
            files,
            selected_file: 0,
            paste_buffer: String::new(),
            code_buffer: String::new(),
            flash: None,
            dashboard: None,
            show_raw: false,
            should_quit: false,
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the TUI event loop until the user quits.
    ///
    /// Uses `crossterm::event::poll` (synchronous, with a 250 ms timeout);
    /// the analysis pipeline completes inline within a keypress, so no other
    /// thread or task is needed. Terminal state is restored unconditionally.
    pub fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            terminal.draw(|frame| self.render(frame))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }

            if self.should_quit {
                break Ok(());
            }
        };

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        result
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    /// Dispatch one key event against the current screen.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Gate => self.handle_gate_key(key),
            Screen::DataEntry => self.handle_entry_key(key),
            Screen::Dashboard => self.handle_dashboard_key(key),
        }
    }

    fn handle_gate_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let attempt = std::mem::take(&mut self.code_buffer);
                if self.session.unlock(&attempt) {
                    self.flash = None;
                    self.screen = Screen::DataEntry;
                } else if !attempt.is_empty() {
                    // An empty attempt is not an error, just a no-op.
                    self.flash = Some("Wrong access code".to_string());
                }
            }
            KeyCode::Backspace => {
                self.code_buffer.pop();
            }
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(c) => self.code_buffer.push(c),
            _ => {}
        }
    }

    fn handle_entry_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => {
                self.input_mode = match self.input_mode {
                    InputMode::Files => InputMode::Paste,
                    InputMode::Paste => InputMode::Files,
                };
                self.flash = None;
            }
            KeyCode::Esc => {
                if self.dashboard.is_some() {
                    self.flash = None;
                    self.screen = Screen::Dashboard;
                }
            }
            _ => match self.input_mode {
                InputMode::Files => self.handle_file_list_key(key),
                InputMode::Paste => self.handle_paste_key(key),
            },
        }
    }

    fn handle_file_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.selected_file = self.selected_file.saturating_sub(1),
            KeyCode::Down => {
                if self.selected_file + 1 < self.files.len() {
                    self.selected_file += 1;
                }
            }
            KeyCode::Enter => self.load_selected_file(),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_paste_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.load_pasted()
            }
            KeyCode::Enter => self.paste_buffer.push('\n'),
            KeyCode::Backspace => {
                self.paste_buffer.pop();
            }
            KeyCode::Char(c) => self.paste_buffer.push(c),
            _ => {}
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char('m') => {
                self.session.cycle_metric();
                self.rebuild();
            }
            KeyCode::Char('g') => {
                self.session.cycle_group();
                self.rebuild();
            }
            KeyCode::Char('d') => {
                self.session.cycle_date();
                self.rebuild();
            }
            KeyCode::Char('r') => self.show_raw = !self.show_raw,
            KeyCode::Char('n') => {
                self.files = loader::find_data_files(&self.data_dir);
                self.selected_file = 0;
                self.flash = None;
                self.screen = Screen::DataEntry;
            }
            KeyCode::Char('l') => self.lock(),
            _ => {}
        }
    }

    // ── Loading & recompute ───────────────────────────────────────────────────

    fn load_selected_file(&mut self) {
        let Some(path) = self.files.get(self.selected_file).cloned() else {
            return;
        };
        match loader::load_path(&path) {
            Ok(dataset) => self.install(dataset),
            Err(e) => self.flash = Some(e.to_string()),
        }
    }

    fn load_pasted(&mut self) {
        if self.paste_buffer.trim().is_empty() {
            return;
        }
        match loader::load_pasted(&self.paste_buffer) {
            Ok(dataset) => self.install(dataset),
            // The previously installed dataset stays untouched; the user
            // corrects the text and retries.
            Err(e) => self.flash = Some(e.to_string()),
        }
    }

    fn install(&mut self, dataset: Dataset) {
        match self.session.install(dataset) {
            Ok(()) => {
                self.flash = None;
                self.paste_buffer.clear();
                self.rebuild();
                if self.dashboard.is_some() {
                    self.screen = Screen::Dashboard;
                }
            }
            Err(e) => self.flash = Some(e.to_string()),
        }
    }

    /// Recompute the dashboard snapshot from the session's current state.
    fn rebuild(&mut self) {
        match pipeline::rebuild(&self.session) {
            Ok(snapshot) => {
                debug!("Dashboard rebuilt: {}", snapshot.is_some());
                self.dashboard = snapshot;
            }
            Err(e) => {
                self.dashboard = None;
                self.flash = Some(e.to_string());
            }
        }
    }

    fn lock(&mut self) {
        self.session.lock();
        self.dashboard = None;
        self.show_raw = false;
        self.code_buffer.clear();
        self.paste_buffer.clear();
        self.flash = None;
        self.screen = Screen::Gate;
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        match self.screen {
            Screen::Gate => gate_view::render(
                frame,
                area,
                &self.code_buffer,
                self.flash.as_deref(),
                &self.theme,
            ),
            Screen::DataEntry => entry_view::render(
                frame,
                area,
                &EntryViewData {
                    mode: self.input_mode,
                    files: &self.files,
                    selected: self.selected_file,
                    paste_buffer: &self.paste_buffer,
                    flash: self.flash.as_deref(),
                    has_dataset: self.session.has_dataset(),
                },
                &self.theme,
            ),
            Screen::Dashboard => match (&self.dashboard, self.session.dataset()) {
                (Some(dashboard), Some(dataset)) => dashboard_view::render(
                    frame,
                    area,
                    &DashboardViewData {
                        dashboard,
                        dataset,
                        date_col: self.session.date_col(),
                        show_raw: self.show_raw,
                    },
                    &self.theme,
                ),
                _ => render_waiting(frame, area, &self.theme),
            },
        }
    }
}

/// Placeholder shown if the dashboard screen is reached without data.
fn render_waiting(frame: &mut Frame, area: ratatui::layout::Rect, theme: &Theme) {
    use ratatui::text::{Line, Span, Text};
    use ratatui::widgets::{Block, Borders, Paragraph};

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Waiting for data... load a file or paste CSV to begin.",
            theme.info,
        )),
        Line::from(Span::styled("Press 'n' to open data entry.", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" brandboard "),
        ),
        area,
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────
