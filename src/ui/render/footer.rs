use crate::session::{Focus, InputMode, Session, FOLDER_PROMPT_PLACEHOLDER};
use crate::ui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub(super) fn render_footer(frame: &mut Frame, area: Rect, session: &Session) {
    let focused = session.focus == Focus::Input;
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Theme::border())
        .style(Style::default().bg(Theme::BG));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (prompt, value, placeholder) = match session.input_mode {
        InputMode::Prompt => ("▸ ", session.input.as_str(), session.placeholder.as_str()),
        InputMode::FolderPath => (
            "open ",
            session.folder_input.as_str(),
            FOLDER_PROMPT_PLACEHOLDER,
        ),
    };

    let prompt_style = if focused {
        Style::default()
            .fg(Theme::WHITE)
            .add_modifier(Modifier::BOLD)
    } else {
        Theme::text_dim()
    };
    let mut input_spans = vec![Span::styled(format!("  {}", prompt), prompt_style)];

    if value.is_empty() {
        let style = if session.input_locked {
            Style::default()
                .fg(Theme::CYAN)
                .add_modifier(Modifier::ITALIC)
        } else {
            Theme::text_dim()
        };
        input_spans.push(Span::styled(placeholder.to_string(), style));
    } else {
        // Show the tail when the line is wider than the footer
        let room = (inner.width as usize).saturating_sub(prompt.width() + 4);
        let shown = tail(value, room);
        input_spans.push(Span::styled(shown, Theme::text()));
    }
    if focused && !session.input_locked {
        input_spans.push(Span::styled(
            "█",
            Style::default().fg(Theme::GREY_300),
        ));
    }

    let mut hints = vec![Span::raw("  ")];
    let keys: &[(&str, &str)] = match (session.input_mode, session.focus) {
        (InputMode::FolderPath, _) => &[("↵", "load"), ("Esc", "cancel")],
        (InputMode::Prompt, Focus::Input) => &[
            ("↵", "send"),
            ("^E", "command"),
            ("^R", "run"),
            ("^O", "open folder"),
            ("Tab", "tree"),
            ("Esc", "quit"),
        ],
        (InputMode::Prompt, Focus::Tree) => &[
            ("↑↓", "move"),
            ("↵", "open"),
            ("PgUp/PgDn", "scroll"),
            ("Tab", "input"),
            ("Esc", "quit"),
        ],
    };
    for (key, label) in keys {
        hints.push(Span::styled(format!(" {} ", key), Theme::key()));
        hints.push(Span::styled(format!(" {}  ", label), Theme::text_dim()));
    }

    let lines = vec![Line::from(input_spans), Line::from(""), Line::from(hints)];
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Last `width` columns of `text`
fn tail(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out: Vec<char> = Vec::new();
    let mut used = 0;
    for c in text.chars().rev() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.into_iter().rev().collect()
}
