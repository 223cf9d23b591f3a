//! Chat bubbles for a plain terminal.
//!
//! Hangul and emoji are two columns wide, so all measuring goes through
//! `unicode-width` rather than `chars().count()`.

use crate::core::message::{Role, Turn};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Narrowest bubble body we will lay out.
const MIN_BODY_WIDTH: usize = 10;
/// Columns taken by `│ ` and ` │`.
const BORDER_WIDTH: usize = 4;

/// Word-wrap `text` to `width` display columns. Words longer than a line are
/// split between characters. Explicit newlines are kept.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0;

        for word in paragraph.split(' ') {
            let word_width = word.width();
            let gap = usize::from(!current.is_empty());

            if current_width + gap + word_width <= width {
                if gap == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += gap + word_width;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }

            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if current_width + ch_width > width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(ch);
                current_width += ch_width;
            }
        }

        lines.push(current);
    }

    lines
}

fn pad_to(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

/// Render one turn as a boxed bubble inside `terminal_width` columns.
/// User bubbles hug the right edge; persona bubbles the left.
pub fn render_bubble(turn: &Turn, speaker: &str, terminal_width: usize) -> String {
    let max_body = (terminal_width * 3 / 4)
        .saturating_sub(BORDER_WIDTH)
        .max(MIN_BODY_WIDTH);
    let lines = wrap_text(&turn.content, max_body);
    let body_width = lines
        .iter()
        .map(|line| line.width())
        .chain(std::iter::once(speaker.width()))
        .max()
        .unwrap_or(0);

    let bubble_width = body_width + BORDER_WIDTH;
    let indent = match turn.role {
        Role::User => " ".repeat(terminal_width.saturating_sub(bubble_width)),
        Role::Assistant => String::new(),
    };

    let mut out = Vec::with_capacity(lines.len() + 3);
    let header = match turn.role {
        Role::User => format!("{}{}", " ".repeat(bubble_width - speaker.width()), speaker),
        Role::Assistant => speaker.to_string(),
    };
    out.push(format!("{indent}{header}"));
    out.push(format!("{indent}╭{}╮", "─".repeat(body_width + 2)));
    for line in &lines {
        out.push(format!("{indent}│ {} │", pad_to(line, body_width)));
    }
    out.push(format!("{indent}╰{}╯", "─".repeat(body_width + 2)));

    out.join("\n")
}

const FALLBACK_WIDTH: usize = 80;

/// Width of the attached terminal, or 80 when it cannot be queried.
pub fn terminal_width() -> usize {
    usable_width(crossterm::terminal::size().ok().map(|(columns, _)| columns))
}

fn usable_width(reported: Option<u16>) -> usize {
    reported
        .map(usize::from)
        .filter(|width| *width >= MIN_BODY_WIDTH + BORDER_WIDTH)
        .unwrap_or(FALLBACK_WIDTH)
}
