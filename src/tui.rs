//! TUI (Terminal User Interface) module for Hangman
//!
//! This module provides an interactive terminal interface using Ratatui.
//!
//! # Architecture
//! - `TuiInterface`: renders snapshots and turns key presses into `UserAction`s
//!
//! # State Machine
//! - `Playing`: letters are guesses, punctuation/function keys are commands
//! - `RoundOver`: letters are ignored; ENTER moves to the next word

use crate::error::GameError;
use crate::game_state::{BodyPart, RoundStatus, Snapshot};
use crate::session::{GameInterface, UserAction};
use crate::wordbank::Difficulty;
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;
use std::time::Duration;

const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const ASCII_CONTROL_CHAR_THRESHOLD: u32 = 32;
const LOW_TIME_SECS: u32 = 10;
const GALLOWS_WIDTH: u16 = 15;

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);

const GALLOWS: [&str; 7] = [
    "  +---+",
    "  |   |",
    "      |",
    "      |",
    "      |",
    "      |",
    "=========",
];

/// Gallows art with `parts` drawn in.
#[must_use]
pub fn gallows_lines(parts: &[BodyPart]) -> Vec<String> {
    let mut grid: Vec<Vec<char>> = GALLOWS.iter().map(|row| row.chars().collect()).collect();
    for part in parts {
        let (row, col, ch) = match part {
            BodyPart::Head => (2, 2, 'O'),
            BodyPart::Body => (3, 2, '|'),
            BodyPart::RightArm => (3, 1, '/'),
            BodyPart::LeftArm => (3, 3, '\\'),
            BodyPart::RightLeg => (4, 1, '/'),
            BodyPart::LeftLeg => (4, 3, '\\'),
        };
        grid[row][col] = ch;
    }
    grid.into_iter().map(|row| row.into_iter().collect()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TuiState {
    Playing,
    RoundOver,
}

impl TuiState {
    fn from_status(status: RoundStatus) -> Self {
        if status.is_terminal() {
            Self::RoundOver
        } else {
            Self::Playing
        }
    }
}

/// Context for rendering the UI - groups related parameters to avoid too many function arguments.
struct RenderContext<'a> {
    snapshot: Option<&'a Snapshot>,
    state: TuiState,
    message: &'a str,
    error_message: &'a str,
    status: &'a str,
}

/// Main TUI interface component.
///
/// Manages terminal rendering, input handling, and round display.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    snapshot: Option<Snapshot>,
    state: TuiState,
    pending_part: Option<BodyPart>,
    message: String,
    error_message: String,
    status: String,
}

impl TuiInterface {
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal setup complete: raw mode, alternate screen, cursor hidden");

        Ok(Self {
            terminal,
            snapshot: None,
            state: TuiState::Playing,
            pending_part: None,
            message: String::new(),
            error_message: String::new(),
            status: "Ready".to_string(),
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    fn draw(&mut self) -> Result<(), io::Error> {
        let ctx = RenderContext {
            snapshot: self.snapshot.as_ref(),
            state: self.state,
            message: &self.message,
            error_message: &self.error_message,
            status: &self.status,
        };

        self.terminal.draw(|f| {
            Self::render_static(f, &ctx);
        })?;
        Ok(())
    }

    /// Log and handle draw errors appropriately
    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    fn render_static(f: &mut Frame, ctx: &RenderContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(9), // Gallows + word
                Constraint::Min(6),    // Info panel
                Constraint::Length(3), // Status line
                Constraint::Length(3), // Instructions
            ])
            .split(f.area());

        let board = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(GALLOWS_WIDTH), Constraint::Min(20)])
            .split(chunks[1]);

        Self::render_title(f, chunks[0], ctx.snapshot);
        Self::render_gallows(f, board[0], ctx.snapshot);
        Self::render_word(f, board[1], ctx.snapshot);
        Self::render_info(f, chunks[2], ctx);
        Self::render_status(f, chunks[3], ctx.status);
        Self::render_instructions(f, chunks[4], ctx.state);
    }

    fn render_title(f: &mut Frame, area: Rect, snapshot: Option<&Snapshot>) {
        let title = match snapshot {
            Some(s) => format!("HANGMAN - {}", s.difficulty.as_str().to_uppercase()),
            None => "HANGMAN".to_string(),
        };
        let title = Paragraph::new(title)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn render_gallows(f: &mut Frame, area: Rect, snapshot: Option<&Snapshot>) {
        let parts = snapshot.map_or(&[] as &[BodyPart], Snapshot::drawn_parts);
        let lines: Vec<Line> = gallows_lines(parts).into_iter().map(Line::from).collect();
        let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_word(f: &mut Frame, area: Rect, snapshot: Option<&Snapshot>) {
        let mut lines = Vec::new();
        if let Some(s) = snapshot {
            let mut spans = vec![Span::raw("  ")];
            for slot in &s.pattern {
                let (letter, style) = match slot {
                    Some(c) if s.revealed => (*c, INFO_STYLE),
                    Some(c) => (*c, SUCCESS_STYLE),
                    None => ('_', Style::default().fg(Color::White)),
                };
                spans.push(Span::styled(
                    format!(" {} ", letter.to_ascii_uppercase()),
                    style.bg(Color::DarkGray),
                ));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(spans));
            lines.push(Line::from(""));

            let guessed: Vec<String> = s
                .guessed
                .iter()
                .map(|c| c.to_ascii_uppercase().to_string())
                .collect();
            lines.push(Line::from(format!("  Guessed: {}", guessed.join(" "))));

            match s.status {
                RoundStatus::InProgress => {}
                RoundStatus::Won => {
                    lines.push(Line::from(Span::styled("  You won!", SUCCESS_STYLE)));
                }
                RoundStatus::Lost => {
                    let answer = s.answer.as_deref().unwrap_or("?").to_uppercase();
                    lines.push(Line::from(Span::styled(
                        format!("  Round lost. The word was {answer}."),
                        ERROR_STYLE,
                    )));
                }
            }
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Word").borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_info(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let mut lines = Vec::new();

        if let Some(s) = ctx.snapshot {
            let time_style = if s.time_left <= LOW_TIME_SECS {
                ERROR_STYLE
            } else {
                Style::default()
            };
            lines.push(Line::from(vec![
                Span::styled(format!("Score: {}", s.score), HEADER_STYLE),
                Span::raw("   "),
                Span::styled(format!("Time left: {}s", s.time_left), time_style),
            ]));
            lines.push(Line::from(format!(
                "Mistakes: {}   Wrong in a row: {}/{}",
                s.mistakes, s.streak, s.max_mistakes
            )));
            if s.hint_available {
                lines.push(Line::from(Span::styled("Hint available (press ?)", INFO_STYLE)));
            }
            lines.push(Line::from(""));
        }

        if !ctx.message.is_empty() {
            lines.push(Line::from(vec![Span::styled(ctx.message, MESSAGE_STYLE)]));
        }

        if !ctx.error_message.is_empty() {
            lines.push(Line::from(vec![Span::styled(ctx.error_message, ERROR_STYLE)]));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Information").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_instructions(f: &mut Frame, area: Rect, state: TuiState) {
        let text = match state {
            TuiState::Playing => {
                "A-Z: Guess | ?: Hint | !: Reveal | TAB: Next word | F5: Restart | 1/2/3: Difficulty | ESC: Quit"
            }
            TuiState::RoundOver => {
                "ENTER: Next word | F5: Restart | 1/2/3: Difficulty | ESC: Quit"
            }
        };

        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_status(f: &mut Frame, area: Rect, status: &str) {
        let status_text = if status.is_empty() { "Ready" } else { status };
        let paragraph = Paragraph::new(status_text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(paragraph, area);
    }

    fn handle_input(&mut self) -> Result<Option<UserAction>, io::Error> {
        // Short timeout so the game loop can apply timer ticks between key presses
        if !event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) => {
                // Only process Press events, ignore Release and Repeat to avoid double input
                if key.kind != event::KeyEventKind::Press {
                    return Ok(None);
                }
                debug_log!(
                    "handle_input() - Key event received: code={:?}, modifiers={:?}",
                    key.code,
                    key.modifiers
                );
                match key_to_action(self.state, key) {
                    Ok(action) => {
                        if action.is_some() {
                            self.error_message.clear();
                        }
                        Ok(action)
                    }
                    Err(message) => {
                        self.error_message = message;
                        Ok(None)
                    }
                }
            }
            Event::Resize(_, _) => {
                self.draw_or_log();
                Ok(None)
            }
            other => {
                debug_log!("handle_input() - Ignoring event: {:?}", other);
                Ok(None)
            }
        }
    }
}

fn has_modifier_keys(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::ALT) || key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Maps a key press to an action. `Err` carries a message for the player.
fn key_to_action(state: TuiState, key: KeyEvent) -> Result<Option<UserAction>, String> {
    if key.code == KeyCode::Esc {
        return Ok(Some(UserAction::Exit));
    }
    // Filter out invalid characters that come from terminal focus events (alt-tab)
    if let KeyCode::Char(c) = key.code
        && (c == '\u{FFFD}' || (c as u32) < ASCII_CONTROL_CHAR_THRESHOLD)
    {
        return Ok(None);
    }
    if has_modifier_keys(&key) {
        return Ok(None);
    }

    let action = match (state, key.code) {
        (_, KeyCode::Char(c @ '1'..='3')) => {
            let difficulty: Difficulty = c.to_string().parse().map_err(|e: GameError| e.to_string())?;
            Some(UserAction::Difficulty(difficulty))
        }
        (_, KeyCode::F(5)) => Some(UserAction::Restart),
        (TuiState::Playing, KeyCode::Char(c)) if c.is_ascii_alphabetic() => {
            Some(UserAction::Guess(c))
        }
        (TuiState::Playing, KeyCode::Char('?')) => Some(UserAction::Hint),
        (TuiState::Playing, KeyCode::Char('!')) => Some(UserAction::Reveal),
        (TuiState::Playing, KeyCode::Tab) => Some(UserAction::Next),
        (TuiState::Playing, KeyCode::Char(c)) => {
            return Err(format!("Only letters can be guessed! ('{c}' is not a letter)"));
        }
        (TuiState::RoundOver, KeyCode::Enter | KeyCode::Tab) => Some(UserAction::Next),
        _ => None,
    };
    Ok(action)
}

impl GameInterface for TuiInterface {
    fn read_action(&mut self) -> Option<UserAction> {
        if self.draw().is_err() {
            info_log!("read_action() - Draw failed, returning Exit");
            return Some(UserAction::Exit);
        }

        match self.handle_input() {
            Ok(action) => {
                if let Some(action) = action {
                    info_log!("read_action() - Action received: {:?}", action);
                }
                action
            }
            Err(e) => {
                info_log!("read_action() - Error handling input: {}, returning Exit", e);
                Some(UserAction::Exit)
            }
        }
    }

    fn render(&mut self, snapshot: &Snapshot) {
        let previous = self.state;
        self.state = TuiState::from_status(snapshot.status);
        if previous == TuiState::RoundOver && self.state == TuiState::Playing {
            self.message.clear();
            self.error_message.clear();
        }
        self.status = match snapshot.status {
            RoundStatus::InProgress => format!(
                "{} word, {} letters - guess away",
                snapshot.difficulty, snapshot.word_length
            ),
            RoundStatus::Won => format!("Round won! Score: {}", snapshot.score),
            RoundStatus::Lost if snapshot.revealed => "Answer revealed".to_string(),
            RoundStatus::Lost if snapshot.time_left == 0 => "Out of time!".to_string(),
            RoundStatus::Lost => "Too many wrong guesses in a row".to_string(),
        };
        self.snapshot = Some(snapshot.clone());
        self.draw_or_log();
    }

    fn draw_part(&mut self, part: BodyPart) {
        debug_log!("draw_part() - {:?}", part);
        self.pending_part = Some(part);
    }

    fn guess_feedback(&mut self, letter: char, correct: bool) {
        let letter = letter.to_ascii_uppercase();
        self.message = match (correct, self.pending_part.take()) {
            (true, _) => format!("Yes! {letter} is in the word."),
            (false, Some(part)) => {
                format!("No {letter} in the word. The hangman gains a {}.", part.name())
            }
            (false, None) => format!("No {letter} in the word."),
        };
    }

    fn display_message(&mut self, message: &str) {
        self.message = message.to_string();
        self.draw_or_log();
    }

    fn display_error(&mut self, error: &GameError) {
        self.error_message = error.to_string();
        self.draw_or_log();
    }

    fn display_exit_message(&mut self) {
        self.message = "Exiting...".to_string();
        self.status = "Exiting application...".to_string();
        self.draw_or_log();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_gallows_empty() {
        let lines = gallows_lines(&[]);
        assert_eq!(lines.len(), GALLOWS.len());
        assert_eq!(lines[2], "      |");
    }

    #[test]
    fn test_gallows_full_figure() {
        let lines = gallows_lines(&BodyPart::ALL);
        assert_eq!(lines[2], "  O   |");
        assert_eq!(lines[3], " /|\\  |");
        assert_eq!(lines[4], " / \\  |");
    }

    #[test]
    fn test_letters_guess_while_playing() {
        assert_eq!(
            key_to_action(TuiState::Playing, press(KeyCode::Char('k'))),
            Ok(Some(UserAction::Guess('k')))
        );
        assert_eq!(
            key_to_action(TuiState::RoundOver, press(KeyCode::Char('k'))),
            Ok(None)
        );
    }

    #[test]
    fn test_command_keys() {
        assert_eq!(
            key_to_action(TuiState::Playing, press(KeyCode::Char('?'))),
            Ok(Some(UserAction::Hint))
        );
        assert_eq!(
            key_to_action(TuiState::Playing, press(KeyCode::Char('!'))),
            Ok(Some(UserAction::Reveal))
        );
        assert_eq!(
            key_to_action(TuiState::Playing, press(KeyCode::Tab)),
            Ok(Some(UserAction::Next))
        );
        assert_eq!(
            key_to_action(TuiState::RoundOver, press(KeyCode::Enter)),
            Ok(Some(UserAction::Next))
        );
        assert_eq!(
            key_to_action(TuiState::RoundOver, press(KeyCode::F(5))),
            Ok(Some(UserAction::Restart))
        );
        assert_eq!(
            key_to_action(TuiState::Playing, press(KeyCode::Char('3'))),
            Ok(Some(UserAction::Difficulty(Difficulty::Hard)))
        );
        assert_eq!(
            key_to_action(TuiState::RoundOver, press(KeyCode::Esc)),
            Ok(Some(UserAction::Exit))
        );
    }

    #[test]
    fn test_non_letter_rejected_with_message() {
        let result = key_to_action(TuiState::Playing, press(KeyCode::Char('7')));
        assert!(result.unwrap_err().contains("'7'"));
    }

    #[test]
    fn test_modifier_keys_ignored() {
        let key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(TuiState::Playing, key), Ok(None));
    }
}
