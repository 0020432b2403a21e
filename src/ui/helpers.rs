//! UI helper functions and utilities

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Wrap text to fit within a given display width
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    wrap_text_variable_width(text, width, width)
}

/// Wrap text with different widths for first line vs continuation lines
/// This is useful when the first line has a prefix that takes up space
pub fn wrap_text_variable_width(
    text: &str,
    first_line_width: usize,
    continuation_width: usize,
) -> Vec<String> {
    if first_line_width == 0 || continuation_width == 0 {
        return vec![text.to_string()];
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        let limit = if lines.is_empty() {
            first_line_width
        } else {
            continuation_width
        };

        if current_line.is_empty() {
            current_line = break_long_word(word, limit, continuation_width, &mut lines);
        } else if current_line.width() + 1 + word.width() <= limit {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current_line));
            current_line = break_long_word(word, continuation_width, continuation_width, &mut lines);
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}

/// Push full-width chunks of an over-long word, returning the remainder
fn break_long_word(
    word: &str,
    first_width: usize,
    rest_width: usize,
    lines: &mut Vec<String>,
) -> String {
    let mut limit = first_width;
    let mut chunk = String::new();
    let mut chunk_width = 0;

    for c in word.chars() {
        let w = c.width().unwrap_or(0);
        if chunk_width + w > limit && !chunk.is_empty() {
            lines.push(std::mem::take(&mut chunk));
            chunk_width = 0;
            limit = rest_width;
        }
        chunk.push(c);
        chunk_width += w;
    }
    chunk
}

/// Cut `text` to `max` display columns, ending in `…` when shortened
pub fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
