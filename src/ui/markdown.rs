//! Markdown to ratatui styled text converter
//!
//! Assistant prose arrives as markdown once fenced code has been split off.
//! Headers, lists, quotes and inline emphasis are styled; anything else is
//! wrapped as a plain paragraph.

use super::helpers::wrap_text;
use super::theme::Theme;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

/// Parse markdown text and convert to styled Lines
pub fn parse_markdown(text: &str, max_width: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            lines.push(Line::from(""));
        } else if line.starts_with("```") {
            // Stray fence from an unterminated block
            lines.push(Line::from(Span::styled(line.to_string(), Theme::code())));
        } else if let Some(content) = line.strip_prefix("# ") {
            lines.push(render_header(content, Theme::WHITE));
        } else if let Some(content) = line.strip_prefix("## ") {
            lines.push(render_header(content, Theme::GREY_100));
        } else if let Some(content) = line.strip_prefix("### ") {
            lines.push(render_header(&format!("• {}", content), Theme::GREY_200));
        } else if let Some(content) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
            push_prefixed(&mut lines, content, "  • ", "    ", max_width);
        } else if let Some(content) = line.strip_prefix("> ") {
            push_prefixed(&mut lines, content, "  │ ", "  │ ", max_width);
        } else if let Some((number, content)) = numbered_item(line) {
            let first = format!("  {}. ", number);
            let rest = " ".repeat(first.chars().count());
            push_prefixed(&mut lines, content, &first, &rest, max_width);
        } else {
            lines.extend(wrap_and_parse_inline(line, max_width));
        }
    }

    lines
}

/// `12. text` as `("12", "text")`
fn numbered_item(line: &str) -> Option<(&str, &str)> {
    let (number, content) = line.split_once(". ")?;
    if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) {
        Some((number, content))
    } else {
        None
    }
}

fn render_header(text: &str, color: ratatui::style::Color) -> Line<'static> {
    Line::from(vec![Span::styled(
        text.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )])
}

fn push_prefixed(
    lines: &mut Vec<Line<'static>>,
    content: &str,
    first_prefix: &str,
    rest_prefix: &str,
    max_width: usize,
) {
    let width = max_width.saturating_sub(first_prefix.chars().count());
    for (i, styled_line) in wrap_and_parse_inline(content, width).into_iter().enumerate() {
        let prefix = if i == 0 { first_prefix } else { rest_prefix };
        let mut spans = vec![Span::styled(prefix.to_string(), Theme::text_dim())];
        spans.extend(styled_line.spans);
        lines.push(Line::from(spans));
    }
}

/// Wrap first, then parse inline elements on each wrapped line
fn wrap_and_parse_inline(text: &str, max_width: usize) -> Vec<Line<'static>> {
    wrap_text(text, max_width)
        .into_iter()
        .map(|line| parse_inline_markdown(&line))
        .collect()
}

fn flush(spans: &mut Vec<Span<'static>>, current: &mut String) {
    if !current.is_empty() {
        spans.push(Span::styled(std::mem::take(current), Theme::text()));
    }
}

/// Parse inline markdown elements (bold, italic, code)
fn parse_inline_markdown(text: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    let mut current_text = String::new();

    while i < chars.len() {
        // Bold: **text** or __text__
        if i + 1 < chars.len()
            && ((chars[i] == '*' && chars[i + 1] == '*')
                || (chars[i] == '_' && chars[i + 1] == '_'))
        {
            let marker = chars[i];
            let start = i + 2;
            let mut j = start;
            while j + 1 < chars.len() && !(chars[j] == marker && chars[j + 1] == marker) {
                j += 1;
            }

            if j + 1 < chars.len() {
                flush(&mut spans, &mut current_text);
                spans.push(Span::styled(
                    chars[start..j].iter().collect::<String>(),
                    Style::default()
                        .fg(Theme::WHITE)
                        .add_modifier(Modifier::BOLD),
                ));
                i = j + 2;
                continue;
            }
        }

        // Inline code: `text`
        if chars[i] == '`' {
            if let Some(offset) = chars[i + 1..].iter().position(|&c| c == '`') {
                let j = i + 1 + offset;
                flush(&mut spans, &mut current_text);
                spans.push(Span::styled(
                    chars[i + 1..j].iter().collect::<String>(),
                    Theme::code(),
                ));
                i = j + 1;
                continue;
            }
        }

        // Italic: *text* or _text_
        if (chars[i] == '*' || chars[i] == '_')
            && (i + 1 >= chars.len() || chars[i + 1] != chars[i])
        {
            let marker = chars[i];
            if let Some(offset) = chars[i + 1..].iter().position(|&c| c == marker) {
                let j = i + 1 + offset;
                if j > i + 1 {
                    flush(&mut spans, &mut current_text);
                    spans.push(Span::styled(
                        chars[i + 1..j].iter().collect::<String>(),
                        Style::default()
                            .fg(Theme::GREY_200)
                            .add_modifier(Modifier::ITALIC),
                    ));
                    i = j + 1;
                    continue;
                }
            }
        }

        current_text.push(chars[i]);
        i += 1;
    }

    flush(&mut spans, &mut current_text);

    if spans.is_empty() {
        spans.push(Span::raw(""));
    }

    Line::from(spans)
}
