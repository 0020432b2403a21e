use crate::session::{Session, Viewport};
use crate::ui::helpers::truncate;
use crate::ui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub(super) fn render_editor(frame: &mut Frame, area: Rect, session: &Session) -> Viewport {
    let editor = &session.editor;
    let title = format!(
        " {} ",
        truncate(&editor.title, (area.width as usize).saturating_sub(4))
    );
    let block = Block::default()
        .title(title)
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_style(Theme::border())
        .style(Style::default().bg(Theme::BG));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let total = editor.content.lines().count().max(1);
    let gutter = total.to_string().len();
    let height = inner.height as usize;
    let start = editor.scroll.min(total.saturating_sub(height));

    // Line numbers only for real file content
    let numbered = editor.path.is_some();
    let lines: Vec<Line> = editor
        .content
        .lines()
        .enumerate()
        .skip(start)
        .take(height)
        .map(|(i, line)| {
            let body = Span::styled(line.replace('\t', "    "), Theme::code());
            if numbered {
                Line::from(vec![
                    Span::styled(format!(" {:>gutter$} ", i + 1), Theme::text_dim()),
                    body,
                ])
            } else {
                Line::from(vec![Span::raw(" "), body])
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
    Viewport {
        height,
        chat_lines: None,
    }
}
