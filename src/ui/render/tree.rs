use crate::session::{Focus, Session, READING_STATUS};
use crate::tree::TreeRow;
use crate::ui::helpers::truncate;
use crate::ui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub(super) fn render_tree(frame: &mut Frame, area: Rect, session: &Session) {
    let focused = session.focus == Focus::Tree;
    let block = Block::default()
        .title(" Project Knowledge Map ")
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_style(if focused {
            Theme::border_active()
        } else {
            Theme::border()
        })
        .style(Style::default().bg(Theme::GREY_800));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(status) = &session.tree_status {
        let color = match status.as_str() {
            READING_STATUS => Theme::CYAN,
            s if s.starts_with("Error") => Theme::RED,
            _ => Theme::GREY_400,
        };
        let text = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(status.clone(), Style::default().fg(color))).centered(),
        ]);
        frame.render_widget(text, inner);
        return;
    }

    let width = inner.width as usize;
    let mut lines = Vec::with_capacity(inner.height as usize);
    if let Some(root) = &session.root_name {
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", Theme::ARROW_DOWN), Style::default().fg(Theme::CYAN)),
            Span::styled(
                truncate(root, width.saturating_sub(2)),
                Style::default()
                    .fg(Theme::CYAN)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
    }

    // Keep the cursor in view
    let visible = (inner.height as usize).saturating_sub(lines.len()).max(1);
    let offset = session.tree_cursor.saturating_sub(visible - 1);

    for (idx, row) in session.rows.iter().enumerate().skip(offset).take(visible) {
        let selected = idx == session.tree_cursor;
        lines.push(row_line(row, selected, focused, width));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn row_line(row: &TreeRow, selected: bool, focused: bool, width: usize) -> Line<'static> {
    let indent = "  ".repeat(row.depth + 1);
    let glyph = if row.is_folder {
        if row.expanded && row.has_children {
            Theme::ARROW_DOWN
        } else {
            Theme::ARROW_RIGHT
        }
    } else {
        Theme::FILE_MARK
    };
    let used = indent.chars().count() + 2;
    let name = truncate(&row.name, width.saturating_sub(used));

    let mut name_style = if row.is_folder {
        Style::default().fg(Theme::GREY_100)
    } else {
        Theme::text_muted()
    };
    if row.has_children {
        name_style = name_style.add_modifier(Modifier::BOLD);
    }
    if selected && focused {
        name_style = Theme::selected();
    } else if selected {
        name_style = name_style.add_modifier(Modifier::UNDERLINED);
    }

    Line::from(vec![
        Span::styled(indent, Theme::text_dim()),
        Span::styled(format!("{} ", glyph), Theme::text_dim()),
        Span::styled(name, name_style),
    ])
}
