mod chat;
mod editor;
mod footer;
mod header;
mod tree;

use crate::session::{Session, ViewMode, Viewport};
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
    Frame,
};

use chat::render_chat;
use editor::render_editor;
use footer::render_footer;
use header::render_header;
use tree::render_tree;

/// Main render function. `tick` drives the spinner. Returns what the frame
/// measured so the session can bound its scroll offsets.
pub fn render(frame: &mut Frame, session: &Session, tick: usize) -> Viewport {
    let area = frame.area();

    frame.render_widget(Block::default().style(Style::default().bg(Theme::BG)), area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header + view tabs
            Constraint::Min(6),    // Tree and main view
            Constraint::Length(4), // Input line + hints
        ])
        .split(area);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(layout[1]);

    render_header(frame, layout[0], session);
    render_tree(frame, body[0], session);
    let viewport = match session.view {
        ViewMode::Chat => render_chat(frame, body[1], session, tick),
        ViewMode::Editor => render_editor(frame, body[1], session),
    };
    render_footer(frame, layout[2], session);
    viewport
}
