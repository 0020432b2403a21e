use crate::session::{ChatMessage, Focus, MessageBody, Sender, Session, Viewport};
use crate::ui::helpers::wrap_text;
use crate::ui::markdown::parse_markdown;
use crate::ui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub(super) fn render_chat(
    frame: &mut Frame,
    area: Rect,
    session: &Session,
    tick: usize,
) -> Viewport {
    let block = Block::default()
        .title(" Chat ")
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_style(if session.focus == Focus::Input {
            Theme::border_active()
        } else {
            Theme::border()
        })
        .style(Style::default().bg(Theme::BG));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = (inner.width as usize).saturating_sub(2);
    let mut lines: Vec<Line<'static>> = Vec::new();

    for message in &session.messages {
        push_message(&mut lines, message, width);
    }

    for _ in 0..session.pending_replies {
        lines.push(sender_line(Sender::Assistant, None));
        lines.push(Line::from(Span::styled(
            format!("  {} thinking", Theme::spinner(tick)),
            Style::default().fg(Theme::CYAN),
        )));
        lines.push(Line::from(""));
    }

    // Anchor to the newest line, `chat_scroll` lines up
    let height = inner.height as usize;
    let max_start = lines.len().saturating_sub(height);
    let start = max_start.saturating_sub(session.chat_scroll);
    let chat_lines = lines.len();
    let visible: Vec<Line<'static>> = lines.into_iter().skip(start).take(height).collect();

    frame.render_widget(Paragraph::new(visible), inner);
    Viewport {
        height,
        chat_lines: Some(chat_lines),
    }
}

fn sender_line(sender: Sender, at: Option<&str>) -> Line<'static> {
    let color = match sender {
        Sender::Developer => Theme::WHITE,
        Sender::Assistant => Theme::GREY_200,
    };
    let mut spans = vec![Span::styled(
        format!(" {}", sender.label()),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )];
    if let Some(at) = at {
        spans.push(Span::styled(format!("  {}", at), Theme::text_dim()));
    }
    Line::from(spans)
}

fn push_message(lines: &mut Vec<Line<'static>>, message: &ChatMessage, width: usize) {
    let at = message.at.format("%H:%M").to_string();
    lines.push(sender_line(message.sender, Some(&at)));

    match &message.body {
        MessageBody::Text(text) if message.sender == Sender::Developer => {
            for line in wrap_text(text, width.saturating_sub(2)) {
                lines.push(Line::from(Span::styled(format!("  {}", line), Theme::text())));
            }
        }
        MessageBody::Text(text) => {
            for line in parse_markdown(text, width.saturating_sub(2)) {
                let mut spans = vec![Span::raw("  ")];
                spans.extend(line.spans);
                lines.push(Line::from(spans));
            }
        }
        MessageBody::Code { language, content } => {
            if let Some(lang) = language {
                lines.push(Line::from(Span::styled(format!("  {}", lang), Theme::text_dim())));
            }
            for line in content.lines() {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {} ", Theme::BOX_VERTICAL), Theme::text_dim()),
                    Span::styled(line.replace('\t', "    "), Theme::code()),
                ]));
            }
        }
    }

    lines.push(Line::from(""));
}
