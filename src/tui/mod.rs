pub mod widgets;

use std::cell::Cell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};
use ratatui::Terminal;
use tracing::debug;

use crate::app::App;
use crate::params::ParamUpdate;
use widgets::{centered_rect, PaletteWidget, ParamsWidget, PARAM_ROWS};

const BRIGHTNESS_STEP: i32 = 5;
const MIDPOINT_STEP: f32 = 5.0;
const HUE_STEP: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Params,
}

/// What the keyboard is currently driving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Typing a new hex value for the selected input colour.
    EditHex { buffer: String },
    /// Pasting text to pull colours out of.
    Import { buffer: String },
    /// Pasting text to rewrite with the output colours.
    Convert { buffer: String },
    /// Read-only result of a conversion.
    Converted { text: String },
}

/// State for the interactive TUI application.
pub struct TuiApp {
    pub app: App,
    pub focus: Focus,
    pub mode: Mode,
    pub selected: Option<usize>,
    pub param_cursor: usize,
    pub status: String,
    pub should_quit: bool,
    resynced: Rc<Cell<bool>>,
}

impl TuiApp {
    pub fn new(mut app: App) -> Self {
        let resynced = Rc::new(Cell::new(false));
        let flag = Rc::clone(&resynced);
        app.on_palette_replaced(move |_| flag.set(true));

        let selected = if app.input().is_empty() { None } else { Some(0) };
        Self {
            app,
            focus: Focus::Input,
            mode: Mode::Normal,
            selected,
            param_cursor: 0,
            status: String::from("Press a to add a colour, i to import text, q to quit"),
            should_quit: false,
            resynced,
        }
    }

    /// Run after each frame: deliver palette-replaced notifications and
    /// re-sync the selection to the new entries.
    pub fn after_draw(&mut self) {
        if self.app.dispatch_pending() && self.resynced.replace(false) {
            self.selected = if self.app.input().is_empty() { None } else { Some(0) };
            self.mode = Mode::Normal;
            self.status = format!("Adopted {} output colours as input", self.app.input().len());
        }
    }

    fn selected_id(&self) -> Option<crate::store::EntryId> {
        self.selected
            .and_then(|i| self.app.input().entries().get(i))
            .map(|e| e.id)
    }

    fn clamp_selection(&mut self) {
        let len = self.app.input().len();
        self.selected = match self.selected {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
    }

    fn report<T>(&mut self, result: crate::Result<T>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.status = format!("Error: {e}");
                None
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.mode {
            Mode::Normal => match self.focus {
                Focus::Input => self.handle_input_key(key.code),
                Focus::Params => self.handle_params_key(key.code),
            },
            _ => self.handle_popup_key(key.code),
        }
    }

    /// Bracketed paste goes straight into whichever popup is open.
    pub fn handle_paste(&mut self, text: &str) {
        match &mut self.mode {
            Mode::EditHex { buffer } => buffer.push_str(text.trim()),
            Mode::Import { buffer } | Mode::Convert { buffer } => buffer.push_str(text),
            Mode::Normal | Mode::Converted { .. } => {
                debug!("paste ignored outside an input popup")
            }
        }
    }

    fn handle_input_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.focus = Focus::Params,
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.app.input().len();
                if let Some(i) = self.selected {
                    if i + 1 < len {
                        self.selected = Some(i + 1);
                    }
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(i) = self.selected {
                    self.selected = Some(i.saturating_sub(1));
                }
            }
            KeyCode::Char('J') => self.move_selected(1),
            KeyCode::Char('K') => self.move_selected(-1),
            KeyCode::Char('a') => {
                let added = self.app.add_default();
                if self.report(added).is_some() {
                    self.selected = Some(self.app.input().len() - 1);
                    self.status = String::from("Added colour");
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    let removed = self.app.remove_colour(id);
                    self.report(removed);
                    self.clamp_selection();
                }
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    let buffer = self
                        .app
                        .input()
                        .get(id)
                        .map(|e| e.value.clone())
                        .unwrap_or_default();
                    self.mode = Mode::EditHex { buffer };
                }
            }
            KeyCode::Char('c') => {
                self.app.clear();
                self.selected = None;
                self.status = String::from("Cleared input colours");
            }
            KeyCode::Char('i') => {
                self.mode = Mode::Import {
                    buffer: String::new(),
                }
            }
            KeyCode::Char('t') => {
                self.mode = Mode::Convert {
                    buffer: String::new(),
                }
            }
            KeyCode::Char('r') => {
                if self.app.output().is_empty() {
                    self.status = String::from("Nothing to iterate");
                } else {
                    let iterated = self.app.iterate();
                    self.report(iterated);
                }
            }
            _ => {}
        }
    }

    fn move_selected(&mut self, delta: isize) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let moved = self.app.move_colour(id, delta);
        if self.report(moved).is_some() {
            self.selected = self.app.input().position(id);
        }
    }

    fn handle_params_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.focus = Focus::Input,
            KeyCode::Down | KeyCode::Char('j') => {
                self.param_cursor = (self.param_cursor + 1).min(PARAM_ROWS - 1);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.param_cursor = self.param_cursor.saturating_sub(1);
            }
            KeyCode::Left | KeyCode::Char('h') => self.adjust_param(-1),
            KeyCode::Right | KeyCode::Char('l') => self.adjust_param(1),
            KeyCode::Char(' ') | KeyCode::Enter => self.adjust_param(0),
            _ => {}
        }
    }

    /// Step the parameter under the cursor by `direction`; toggles flip on any
    /// direction including 0.
    fn adjust_param(&mut self, direction: i32) {
        let p = *self.app.params();
        let update = match self.param_cursor {
            0 if direction != 0 => {
                ParamUpdate::Brightness(p.brightness() + direction * BRIGHTNESS_STEP)
            }
            1 => ParamUpdate::InvertEnabled(!p.invert_enabled()),
            2 if direction != 0 => ParamUpdate::InvertMidpoint(
                p.invert_midpoint() + direction as f32 * MIDPOINT_STEP,
            ),
            3 => ParamUpdate::HueShiftEnabled(!p.hue_shift_enabled()),
            4 if direction != 0 => ParamUpdate::HueShiftTarget(
                p.hue_shift_target() + direction as f32 * HUE_STEP,
            ),
            _ => return,
        };
        let applied = self.app.update_param(update);
        self.report(applied);
    }

    fn handle_popup_key(&mut self, code: KeyCode) {
        if matches!(self.mode, Mode::Converted { .. }) {
            if matches!(code, KeyCode::Enter | KeyCode::Esc) {
                self.mode = Mode::Normal;
            }
            return;
        }
        match code {
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Enter => self.submit_popup(),
            KeyCode::Backspace => {
                if let Mode::EditHex { buffer } | Mode::Import { buffer } | Mode::Convert { buffer } =
                    &mut self.mode
                {
                    buffer.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Mode::EditHex { buffer } | Mode::Import { buffer } | Mode::Convert { buffer } =
                    &mut self.mode
                {
                    buffer.push(c);
                }
            }
            _ => {}
        }
    }

    fn submit_popup(&mut self) {
        match std::mem::replace(&mut self.mode, Mode::Normal) {
            Mode::Normal | Mode::Converted { .. } => {}
            Mode::EditHex { buffer } => {
                let Some(id) = self.selected_id() else {
                    return;
                };
                let value = buffer.trim().to_string();
                let updated = self.app.update_colour(id, &value);
                if self.report(updated).is_some() {
                    self.status = format!("Set colour to {value}");
                } else {
                    self.mode = Mode::EditHex { buffer };
                }
            }
            Mode::Import { buffer } => {
                let imported = self.app.import_text(&buffer);
                if let Some(count) = self.report(imported) {
                    self.status = format!("Imported {count} colours");
                    self.clamp_selection();
                }
            }
            Mode::Convert { buffer } => {
                let converted = self.app.convert_text(&buffer);
                match self.report(converted) {
                    Some(text) => {
                        self.status = String::from("Converted text");
                        self.mode = Mode::Converted { text };
                    }
                    None => self.mode = Mode::Convert { buffer },
                }
            }
        }
    }
}

/// Initialize terminal for TUI
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
        .context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("failed to create terminal")
}

/// Restore terminal to normal state
pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )
    .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

/// Launch the TUI application.
pub fn run(app: App) -> Result<()> {
    let mut state = TuiApp::new(app);
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut state, &mut terminal);
    restore_terminal(terminal)?;
    result
}

fn event_loop(
    state: &mut TuiApp,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    while !state.should_quit {
        terminal.draw(|f| render(f, state))?;
        state.after_draw();

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => state.handle_key(key),
                Event::Paste(text) => state.handle_paste(&text),
                _ => {}
            }
        }
    }
    Ok(())
}

/// Render the UI from current state
pub fn render(f: &mut Frame, state: &TuiApp) {
    let [main, status, help] = Layout::vertical([
        Constraint::Min(5),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(f.area());

    let [input_area, params_area, output_area] = Layout::horizontal([
        Constraint::Percentage(36),
        Constraint::Percentage(28),
        Constraint::Percentage(36),
    ])
    .areas(main);

    let input_focused = state.focus == Focus::Input;
    f.render_widget(
        PaletteWidget::new(state.app.input(), "Input")
            .selected(state.selected)
            .focused(input_focused),
        input_area,
    );
    f.render_widget(
        ParamsWidget::new(
            state.app.params(),
            (!input_focused).then_some(state.param_cursor),
        ),
        params_area,
    );
    f.render_widget(
        PaletteWidget::new(state.app.output(), "Output").selected(state.selected),
        output_area,
    );

    f.render_widget(
        Paragraph::new(state.status.as_str()).style(Style::default().fg(Color::Cyan)),
        status,
    );
    f.render_widget(
        Paragraph::new(help_text(state)).style(Style::default().fg(Color::DarkGray)),
        help,
    );

    let popup = match &state.mode {
        Mode::Normal => None,
        Mode::EditHex { buffer } => Some((
            " Edit colour: Enter to set, Esc to cancel ",
            format!("{buffer}_"),
        )),
        Mode::Import { buffer } => Some((
            " Import colours: paste text, Enter to submit ",
            format!("{buffer}_"),
        )),
        Mode::Convert { buffer } => Some((
            " Convert text: paste text, Enter to convert ",
            format!("{buffer}_"),
        )),
        Mode::Converted { text } => {
            Some((" Converted text: Enter or Esc to close ", text.clone()))
        }
    };
    if let Some((title, body)) = popup {
        let area = if matches!(state.mode, Mode::EditHex { .. }) {
            centered_rect(40, 20, f.area())
        } else {
            centered_rect(70, 60, f.area())
        };
        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(body)
                .wrap(Wrap { trim: false })
                .block(Block::bordered().title(title)),
            area,
        );
    }
}

fn help_text(state: &TuiApp) -> &'static str {
    match (&state.mode, state.focus) {
        (Mode::Normal, Focus::Input) => {
            "j/k select  J/K move  a add  d del  e edit  c clear  i import  t convert  r iterate  Tab params  q quit"
        }
        (Mode::Normal, Focus::Params) => {
            "j/k select  h/l adjust  space toggle  Tab colours  q quit"
        }
        (Mode::Converted { .. }, _) => "Enter/Esc close",
        _ => "Enter submit  Esc close  Backspace delete",
    }
}
