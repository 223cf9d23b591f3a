//! Single-line raw-mode prompt used for secrets.

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::fmt;
use std::io::{self, Write};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskMode {
    None,
    Hidden,
    RevealTail { tail_chars: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditorState {
    pub text: String,
    /// Cursor position in chars.
    pub cursor: usize,
    pub reveal_tail: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEditAction {
    Insert(char),
    Backspace,
    MoveLeft,
    MoveRight,
    MoveStart,
    MoveEnd,
    ClearAll,
    ToggleReveal,
    Paste(String),
    Submit,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEditOutcome {
    Continue { redraw: bool },
    Submit(String),
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct LineEditorError {
    message: String,
}

impl LineEditorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for LineEditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LineEditorError {}

impl From<io::Error> for LineEditorError {
    fn from(err: io::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Read one line in raw mode, echoing it through `mask`. Esc and Ctrl+C cancel.
pub fn prompt_masked_line(prompt: &str, mask: &MaskMode) -> Result<String, LineEditorError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    let paste_result = execute!(stdout, event::EnableBracketedPaste);

    let result = paste_result
        .map_err(LineEditorError::from)
        .and_then(|()| read_until_submit(prompt, mask));

    let restore_raw = disable_raw_mode();
    let restore_paste = execute!(stdout, event::DisableBracketedPaste);
    println!();

    let value = result?;
    restore_raw?;
    restore_paste?;
    Ok(value)
}

fn read_until_submit(prompt: &str, mask: &MaskMode) -> Result<String, LineEditorError> {
    let mut state = LineEditorState::default();
    redraw_line(prompt, &state, mask)?;

    loop {
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let action = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => map_key_event(&key, mask),
            Event::Paste(text) => Some(LineEditAction::Paste(text)),
            _ => None,
        };
        let Some(action) = action else {
            continue;
        };

        match apply_action(&mut state, action, mask) {
            LineEditOutcome::Continue { redraw: true } => redraw_line(prompt, &state, mask)?,
            LineEditOutcome::Continue { redraw: false } => {}
            LineEditOutcome::Submit(value) => return Ok(value),
            LineEditOutcome::Cancelled => return Err(LineEditorError::new("Cancelled by user")),
        }
    }
}

fn redraw_line(prompt: &str, state: &LineEditorState, mask: &MaskMode) -> io::Result<()> {
    let shown = masked_text(state, mask);
    let before_cursor: String = shown.chars().take(state.cursor).collect();
    let column = prompt.width() + before_cursor.width();

    let mut stdout = io::stdout();
    write!(stdout, "\r\x1b[K{prompt}{shown}\r")?;
    if column > 0 {
        write!(stdout, "\x1b[{column}C")?;
    }
    stdout.flush()
}

pub fn masked_text(state: &LineEditorState, mask: &MaskMode) -> String {
    let len = state.text.chars().count();
    match mask {
        MaskMode::None => state.text.clone(),
        MaskMode::Hidden => "*".repeat(len),
        MaskMode::RevealTail { tail_chars } if state.reveal_tail && len >= *tail_chars => {
            let hidden = len - tail_chars;
            let tail: String = state.text.chars().skip(hidden).collect();
            format!("{}{tail}", "*".repeat(hidden))
        }
        MaskMode::RevealTail { .. } => "*".repeat(len),
    }
}

pub fn map_key_event(key: &KeyEvent, mask: &MaskMode) -> Option<LineEditAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => Some(LineEditAction::Submit),
        KeyCode::Esc => Some(LineEditAction::Cancel),
        KeyCode::Backspace => Some(LineEditAction::Backspace),
        KeyCode::Left => Some(LineEditAction::MoveLeft),
        KeyCode::Right => Some(LineEditAction::MoveRight),
        KeyCode::Home => Some(LineEditAction::MoveStart),
        KeyCode::End => Some(LineEditAction::MoveEnd),
        KeyCode::F(2) if matches!(mask, MaskMode::RevealTail { .. }) => {
            Some(LineEditAction::ToggleReveal)
        }
        KeyCode::Char('c') if ctrl => Some(LineEditAction::Cancel),
        KeyCode::Char('a') if ctrl => Some(LineEditAction::MoveStart),
        KeyCode::Char('e') if ctrl => Some(LineEditAction::MoveEnd),
        KeyCode::Char('u') if ctrl => Some(LineEditAction::ClearAll),
        KeyCode::Char('\n' | '\r') => Some(LineEditAction::Submit),
        KeyCode::Char(c) if !ctrl => Some(LineEditAction::Insert(c)),
        _ => None,
    }
}

pub fn apply_action(
    state: &mut LineEditorState,
    action: LineEditAction,
    mask: &MaskMode,
) -> LineEditOutcome {
    let len = state.text.chars().count();
    match action {
        LineEditAction::Insert(c) => {
            let at = byte_index(&state.text, state.cursor);
            state.text.insert(at, c);
            state.cursor += 1;
            state.reveal_tail = false;
        }
        LineEditAction::Backspace => {
            if state.cursor == 0 {
                return LineEditOutcome::Continue { redraw: false };
            }
            let start = byte_index(&state.text, state.cursor - 1);
            let end = byte_index(&state.text, state.cursor);
            state.text.replace_range(start..end, "");
            state.cursor -= 1;
            state.reveal_tail = false;
        }
        LineEditAction::MoveLeft if state.cursor > 0 => state.cursor -= 1,
        LineEditAction::MoveRight if state.cursor < len => state.cursor += 1,
        LineEditAction::MoveStart if state.cursor > 0 => state.cursor = 0,
        LineEditAction::MoveEnd if state.cursor < len => state.cursor = len,
        LineEditAction::MoveLeft
        | LineEditAction::MoveRight
        | LineEditAction::MoveStart
        | LineEditAction::MoveEnd => return LineEditOutcome::Continue { redraw: false },
        LineEditAction::ClearAll => {
            if state.text.is_empty() {
                return LineEditOutcome::Continue { redraw: false };
            }
            state.text.clear();
            state.cursor = 0;
            state.reveal_tail = false;
        }
        LineEditAction::ToggleReveal => {
            if !matches!(mask, MaskMode::RevealTail { .. }) {
                return LineEditOutcome::Continue { redraw: false };
            }
            state.reveal_tail = !state.reveal_tail;
        }
        LineEditAction::Paste(text) => {
            let text = text.replace('\r', "\n");
            let (line, rest) = match text.split_once('\n') {
                Some((line, rest)) => (line, Some(rest)),
                None => (text.as_str(), None),
            };
            let line: String = line.chars().filter(|c| !c.is_control()).collect();
            let at = byte_index(&state.text, state.cursor);
            state.text.insert_str(at, &line);
            state.cursor += line.chars().count();
            state.reveal_tail = false;
            if rest.is_some() {
                return LineEditOutcome::Submit(state.text.clone());
            }
        }
        LineEditAction::Submit => return LineEditOutcome::Submit(state.text.clone()),
        LineEditAction::Cancel => return LineEditOutcome::Cancelled,
    }
    LineEditOutcome::Continue { redraw: true }
}

fn byte_index(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(idx, _)| idx)
}
