//! TUI (Terminal User Interface) module for Movie Hangman
//!
//! This module provides an interactive terminal interface using Ratatui.
//!
//! # Architecture
//! - `TuiInterface`: owns the terminal, draws and reads events
//! - `UiState`: everything shown on screen plus input handling, kept apart
//!   from the terminal so it can be tested
//! - `GuessEditor`: the entry line
//!
//! # State Machine
//! - `EnteringGuess` → `GameOver` when a round ends
//! - `GameOver` → `EnteringGuess` when the player chooses to play again
//!
//! Flash messages and the coloured phrase flash expire on their own; the
//! event loop polls with a short timeout so they disappear without input.

use crate::error::HangmanError;
use crate::game_state::{
    GameInterface, GameSummary, UserAction, game_over_message, outcome_message,
};
use crate::session::{GameSession, GuessOutcome, MAX_ATTEMPTS};
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;
use std::time::{Duration, Instant};

const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const FLASH_MESSAGE_MS: u64 = 1500;
const PHRASE_FLASH_MS: u64 = 500;
const GALLOWS_WIDTH: u16 = 24;
const ASCII_CONTROL_CHAR_THRESHOLD: u32 = 32;
const KEYBOARD_ROWS: [&str; 3] = ["QWERTYUIOP", "ASDFGHJKL", "ZXCVBNM"];
/// A key is ` Q ` followed by one space of padding.
const KEY_CELL_WIDTH: usize = 4;

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Cyan);
const TRIES_STYLE: Style = Style::new().fg(Color::LightRed);
const HINT_STYLE: Style = Style::new().fg(Color::Yellow);

/// Gallows drawings indexed by wrong guesses so far.
static GALLOWS: [[&str; 7]; 7] = [
    ["  +---+", "  |   |", "      |", "      |", "      |", "      |", "========="],
    ["  +---+", "  |   |", "  O   |", "      |", "      |", "      |", "========="],
    ["  +---+", "  |   |", "  O   |", "  |   |", "      |", "      |", "========="],
    ["  +---+", "  |   |", "  O   |", " /|   |", "      |", "      |", "========="],
    ["  +---+", "  |   |", "  O   |", " /|\\  |", "      |", "      |", "========="],
    ["  +---+", "  |   |", "  O   |", " /|\\  |", " /    |", "      |", "========="],
    ["  +---+", "  |   |", "  O   |", " /|\\  |", " / \\  |", "      |", "========="],
];

fn gallows_for(attempts_remaining: u8) -> &'static [&'static str; 7] {
    let wrong = MAX_ATTEMPTS.saturating_sub(attempts_remaining) as usize;
    &GALLOWS[wrong.min(GALLOWS.len() - 1)]
}

/// Letter under a click inside the keyboard panel, if any.
///
/// Mirrors how `render_keyboard` lays out rows: bordered block, each row
/// centred the way ratatui centres a line.
#[allow(clippy::cast_possible_truncation)]
fn keyboard_letter_at(area: Rect, column: u16, row: u16) -> Option<char> {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    if row >= inner.y + inner.height || column >= inner.x + inner.width {
        return None;
    }
    let row_index = row.checked_sub(inner.y)? as usize;
    let letters = KEYBOARD_ROWS.get(row_index)?;

    let line_width = (letters.len() * KEY_CELL_WIDTH) as u16;
    let start = inner.x + (inner.width / 2).saturating_sub(line_width / 2);
    let offset = column.checked_sub(start)? as usize;
    if offset % KEY_CELL_WIDTH == KEY_CELL_WIDTH - 1 {
        // Gap between keys
        return None;
    }
    letters.chars().nth(offset / KEY_CELL_WIDTH)
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum KeyState {
    Unused,
    Hit,
    Miss,
}

impl KeyState {
    fn colors(self) -> (Color, Color) {
        match self {
            Self::Unused => (Color::DarkGray, Color::White),
            Self::Hit => (Color::Green, Color::Black),
            Self::Miss => (Color::Red, Color::Black),
        }
    }
}

/// What the UI last saw of the session.
#[derive(Debug, Default)]
struct Board {
    phrase: String,
    phrase_len: usize,
    attempts_remaining: u8,
    guessed: Vec<char>,
    wrong: Vec<char>,
}

impl Board {
    fn from_session(session: &GameSession) -> Self {
        Self {
            phrase: session.display_phrase(),
            phrase_len: session.phrase().chars().count(),
            attempts_remaining: session.attempts_remaining(),
            guessed: session.sorted_guessed_letters().collect(),
            wrong: session.wrong_letters(),
        }
    }

    fn key_state(&self, letter: char) -> KeyState {
        if self.wrong.contains(&letter) {
            KeyState::Miss
        } else if self.guessed.contains(&letter) {
            KeyState::Hit
        } else {
            KeyState::Unused
        }
    }
}

/// A value that disappears after a while.
#[derive(Debug, Clone)]
struct Timed<T> {
    value: T,
    expires_at: Instant,
}

impl<T> Timed<T> {
    fn new(value: T, lifetime: Duration, now: Instant) -> Self {
        Self {
            value,
            expires_at: now + lifetime,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

fn drop_expired<T>(slot: &mut Option<Timed<T>>, now: Instant) {
    if slot.as_ref().is_some_and(|t| t.is_expired(now)) {
        *slot = None;
    }
}

fn outcome_style(outcome: GuessOutcome) -> Style {
    match outcome {
        GuessOutcome::Hit(_) | GuessOutcome::FullMatch => SUCCESS_STYLE,
        GuessOutcome::Miss(_) | GuessOutcome::FullMismatch => ERROR_STYLE,
        GuessOutcome::Repeat(_) | GuessOutcome::Invalid => INFO_STYLE,
    }
}

fn phrase_flash_color(outcome: GuessOutcome) -> Option<Color> {
    match outcome {
        GuessOutcome::Hit(_) | GuessOutcome::FullMatch => Some(Color::Green),
        GuessOutcome::Miss(_) | GuessOutcome::FullMismatch => Some(Color::Red),
        GuessOutcome::Repeat(_) | GuessOutcome::Invalid => None,
    }
}

fn has_modifier_keys(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::ALT) || key.modifiers.contains(KeyModifiers::CONTROL)
}

/// The guess entry line. Input is capped at the length of the current title.
#[derive(Debug, Default)]
struct GuessEditor {
    input: String,
    error_message: String,
    max_len: usize,
}

impl GuessEditor {
    fn handle_key(&mut self, key: KeyEvent) -> Option<UserAction> {
        self.error_message.clear();
        debug_log!(
            "GuessEditor::handle_key() - key: {:?}, input: '{}'",
            key.code,
            self.input
        );

        match key.code {
            KeyCode::Esc => {
                info_log!("GuessEditor::handle_key() - ESC pressed, returning Exit");
                return Some(UserAction::Exit);
            }
            KeyCode::Tab | KeyCode::Char('?') => return Some(UserAction::Hint),
            KeyCode::F(2) => return Some(UserAction::NewGame),
            KeyCode::Char(_) if has_modifier_keys(&key) => {
                debug_log!(
                    "GuessEditor::handle_key() - Ignoring character with modifier: {:?}",
                    key.modifiers
                );
            }
            KeyCode::Char(c) if c.is_ascii_alphabetic() || c == ' ' => {
                if self.input.len() < self.max_len.max(1) {
                    self.input.push(c.to_ascii_uppercase());
                } else {
                    self.error_message = "That is already as long as the movie title!".to_string();
                }
            }
            KeyCode::Char(c) => {
                self.error_message = format!("Only letters are allowed! ('{c}' is not a letter)");
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter => {
                let guess = std::mem::take(&mut self.input);
                info_log!("GuessEditor::handle_key() - Submitting guess '{}'", guess);
                return Some(UserAction::Guess(guess));
            }
            _ => {
                debug_log!("GuessEditor::handle_key() - Ignoring key: {:?}", key.code);
            }
        }
        None
    }

    fn clear(&mut self) {
        self.input.clear();
        self.error_message.clear();
    }
}

fn play_again_answer(key: KeyEvent) -> Option<bool> {
    match key.code {
        KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(true),
        KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(false),
        _ => None,
    }
}

/// Terminal events the game reacts to.
#[derive(Debug, Clone, Copy)]
enum Input {
    Key(KeyEvent),
    Click { column: u16, row: u16 },
}

#[derive(Debug, PartialEq)]
enum TuiState {
    EnteringGuess,
    /// Round finished - the verdict is stored in `UiState::banner`
    GameOver,
}

/// Context for rendering the UI - groups related parameters to avoid too many function arguments.
struct RenderContext<'a> {
    board: &'a Board,
    editor: &'a GuessEditor,
    state: &'a TuiState,
    hint: Option<&'a str>,
    flash: Option<&'a Timed<(String, Style)>>,
    phrase_flash: Option<Color>,
    banner: &'a str,
}

/// Screen contents and input handling, independent of the terminal.
#[derive(Debug)]
struct UiState {
    board: Board,
    editor: GuessEditor,
    state: TuiState,
    hint: Option<String>,
    flash: Option<Timed<(String, Style)>>,
    phrase_flash: Option<Timed<Color>>,
    banner: String,
    /// Where the keyboard was last drawn, for mouse hit-testing.
    keyboard_area: Rect,
}

impl UiState {
    fn new() -> Self {
        Self {
            board: Board::default(),
            editor: GuessEditor::default(),
            state: TuiState::EnteringGuess,
            hint: None,
            flash: None,
            phrase_flash: None,
            banner: String::new(),
            keyboard_area: Rect::default(),
        }
    }

    fn set_flash(&mut self, text: String, style: Style, now: Instant) {
        self.flash = Some(Timed::new(
            (text, style),
            Duration::from_millis(FLASH_MESSAGE_MS),
            now,
        ));
    }

    fn expire(&mut self, now: Instant) {
        drop_expired(&mut self.flash, now);
        drop_expired(&mut self.phrase_flash, now);
    }

    fn render_context(&self) -> RenderContext<'_> {
        RenderContext {
            board: &self.board,
            editor: &self.editor,
            state: &self.state,
            hint: self.hint.as_deref(),
            flash: self.flash.as_ref(),
            phrase_flash: self.phrase_flash.as_ref().map(|t| t.value),
            banner: &self.banner,
        }
    }

    fn show_session(&mut self, session: &GameSession) {
        self.board = Board::from_session(session);
        self.editor.max_len = self.board.phrase_len;
    }

    fn show_outcome(&mut self, guess: &str, outcome: GuessOutcome, now: Instant) {
        self.set_flash(outcome_message(guess, outcome), outcome_style(outcome), now);
        self.phrase_flash = phrase_flash_color(outcome)
            .map(|color| Timed::new(color, Duration::from_millis(PHRASE_FLASH_MS), now));
    }

    fn show_error(&mut self, err: &HangmanError, now: Instant) {
        self.set_flash(format!("Error: {err}"), ERROR_STYLE, now);
    }

    fn show_game_over(&mut self, session: &GameSession) {
        self.state = TuiState::GameOver;
        self.banner = game_over_message(session);
    }

    fn start_new_game(&mut self, now: Instant) {
        self.state = TuiState::EnteringGuess;
        self.editor.clear();
        self.hint = None;
        self.banner.clear();
        self.phrase_flash = None;
        self.set_flash("A new game has started!".to_string(), INFO_STYLE, now);
    }

    /// Turn an input event into an action while a guess is being entered.
    ///
    /// Clicking a keyboard key guesses that letter, replacing whatever was typed.
    fn handle_guess_input(&mut self, input: Input) -> Option<UserAction> {
        match input {
            Input::Key(key) => self.editor.handle_key(key),
            Input::Click { column, row } => {
                let letter = keyboard_letter_at(self.keyboard_area, column, row)?;
                info_log!("handle_guess_input() - Keyboard click on '{}'", letter);
                self.editor.clear();
                Some(UserAction::Guess(letter.to_string()))
            }
        }
    }
}

/// Render the complete UI layout using the provided context.
///
/// Returns the area the keyboard was drawn into.
fn render_static(f: &mut Frame, ctx: &RenderContext) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(11),   // Gallows and board
            Constraint::Length(5), // Keyboard
            Constraint::Length(3), // Message
            Constraint::Length(3), // Instructions
        ])
        .split(f.area());

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(GALLOWS_WIDTH), Constraint::Min(20)])
        .split(chunks[1]);

    render_title(f, chunks[0]);
    render_gallows(f, middle[0], ctx.board.attempts_remaining);
    render_board(f, middle[1], ctx);
    render_keyboard(f, chunks[2], ctx.board);
    render_message(f, chunks[3], ctx);
    render_instructions(f, chunks[4], ctx.state);
    chunks[2]
}

fn render_title(f: &mut Frame, area: Rect) {
    let title = Paragraph::new("BOLLYWOOD HANGMAN")
        .style(HEADER_STYLE)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, area);
}

fn render_gallows(f: &mut Frame, area: Rect, attempts_remaining: u8) {
    let lines: Vec<Line> = gallows_for(attempts_remaining)
        .iter()
        .map(|row| Line::from(*row))
        .collect();
    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn render_board(f: &mut Frame, area: Rect, ctx: &RenderContext) {
    let phrase_style = match ctx.phrase_flash {
        Some(color) => Style::default().fg(color).add_modifier(Modifier::BOLD),
        None => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    };
    let guessed: Vec<String> = ctx.board.guessed.iter().map(char::to_string).collect();

    let mut lines = vec![
        Line::from(Span::styled(ctx.board.phrase.clone(), phrase_style)),
        Line::from(""),
        Line::from(Span::styled(
            format!("Tries left: {}", ctx.board.attempts_remaining),
            TRIES_STYLE,
        )),
        Line::from(Span::styled(
            format!("Guessed letters: {}", guessed.join(" ")),
            Style::default().fg(Color::Gray),
        )),
    ];

    if let Some(hint) = ctx.hint {
        lines.push(Line::from(Span::styled(format!("Hint: {hint}"), HINT_STYLE)));
    }

    if *ctx.state == TuiState::EnteringGuess {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::raw("> "),
            Span::styled(
                format!("{}_", ctx.editor.input),
                Style::default().fg(Color::White).bg(Color::DarkGray),
            ),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title("Movie").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn render_keyboard(f: &mut Frame, area: Rect, board: &Board) {
    let lines: Vec<Line> = KEYBOARD_ROWS
        .iter()
        .map(|row| {
            let mut spans = Vec::new();
            for letter in row.chars() {
                let (bg_color, fg_color) = board.key_state(letter).colors();
                spans.push(Span::styled(
                    format!(" {letter} "),
                    Style::default().fg(fg_color).bg(bg_color),
                ));
                spans.push(Span::raw(" "));
            }
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn render_message(f: &mut Frame, area: Rect, ctx: &RenderContext) {
    let line = if !ctx.banner.is_empty() {
        Line::from(Span::styled(ctx.banner.to_string(), HEADER_STYLE))
    } else if !ctx.editor.error_message.is_empty() {
        Line::from(Span::styled(ctx.editor.error_message.clone(), ERROR_STYLE))
    } else if let Some(flash) = ctx.flash {
        let (text, style) = &flash.value;
        Line::from(Span::styled(text.clone(), *style))
    } else {
        Line::from("")
    };

    let paragraph =
        Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(paragraph, area);
}

fn render_instructions(f: &mut Frame, area: Rect, state: &TuiState) {
    let text = match state {
        TuiState::EnteringGuess => {
            "Type/click a letter or the title | ENTER: Guess | ?/TAB: Hint | F2: New Game | ESC: Quit"
        }
        TuiState::GameOver => "Play again? Y: Yes | N/ESC: Quit",
    };

    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

/// Main TUI interface component.
///
/// Manages terminal rendering, input handling, and game state display.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    ui: UiState,
}

impl TuiInterface {
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal setup complete: alternate screen, mouse capture, cursor hidden");

        Ok(Self {
            terminal,
            ui: UiState::new(),
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            cursor::Show
        )?;
        Ok(())
    }

    /// Draw the current UI state to the terminal.
    fn draw(&mut self) -> Result<(), io::Error> {
        self.ui.expire(Instant::now());

        let ctx = self.ui.render_context();
        let mut keyboard_area = Rect::default();
        self.terminal.draw(|f| {
            keyboard_area = render_static(f, &ctx);
        })?;
        self.ui.keyboard_area = keyboard_area;
        Ok(())
    }

    /// Log and handle draw errors appropriately
    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    /// Wait up to one poll interval for a key press or left click.
    ///
    /// Returns `Ok(None)` on timeout and for events the game does not care about.
    fn next_input(&mut self) -> Result<Option<Input>, io::Error> {
        if !event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) => {
                // Only process Press events, ignore Release and Repeat to avoid double input
                if key.kind != event::KeyEventKind::Press {
                    return Ok(None);
                }
                // Alt-tabbing can leak replacement and control characters
                if let KeyCode::Char(c) = key.code
                    && (c == '\u{FFFD}' || (c as u32) < ASCII_CONTROL_CHAR_THRESHOLD)
                {
                    debug_log!("next_input() - Ignoring invalid character: {:?}", c);
                    return Ok(None);
                }
                Ok(Some(Input::Key(key)))
            }
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => Ok(Some(Input::Click { column, row })),
            other => {
                debug_log!("next_input() - Ignoring event: {:?}", other);
                Ok(None)
            }
        }
    }
}

impl GameInterface for TuiInterface {
    fn display_session(&mut self, session: &GameSession) {
        self.ui.show_session(session);
        self.draw_or_log();
    }

    fn read_action(&mut self) -> Option<UserAction> {
        self.ui.state = TuiState::EnteringGuess;
        loop {
            if self.draw().is_err() {
                info_log!("read_action() - Draw failed, returning Exit");
                return Some(UserAction::Exit);
            }

            match self.next_input() {
                Ok(Some(input)) => {
                    if let Some(action) = self.ui.handle_guess_input(input) {
                        info_log!("read_action() - Action received: {:?}", action);
                        return Some(action);
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    info_log!("read_action() - Input error {}, returning Exit", e);
                    return Some(UserAction::Exit);
                }
            }
        }
    }

    fn display_outcome(&mut self, guess: &str, outcome: GuessOutcome) {
        self.ui.show_outcome(guess, outcome, Instant::now());
    }

    fn display_hint(&mut self, hint: &str) {
        self.ui.hint = Some(hint.to_string());
        self.draw_or_log();
    }

    fn display_game_over(&mut self, session: &GameSession) {
        self.ui.show_game_over(session);
        self.draw_or_log();
    }

    fn ask_play_again(&mut self) -> bool {
        loop {
            if self.draw().is_err() {
                return false;
            }
            match self.next_input() {
                Ok(Some(Input::Key(key))) => {
                    if let Some(answer) = play_again_answer(key) {
                        info_log!("ask_play_again() - Answer: {}", answer);
                        return answer;
                    }
                }
                Ok(Some(Input::Click { .. }) | None) => {}
                Err(_e) => return false,
            }
        }
    }

    fn display_new_game_message(&mut self) {
        self.ui.start_new_game(Instant::now());
    }

    fn display_exit_message(&mut self, summary: &GameSummary) {
        // The alternate screen is left right after this; main prints the summary.
        log::info!("display_exit_message() - {summary}");
    }

    fn display_error(&mut self, err: &HangmanError) {
        self.ui.show_error(err, Instant::now());
        self.draw_or_log();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
