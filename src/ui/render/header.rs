use crate::session::{Session, ViewMode};
use crate::ui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub(super) fn render_header(frame: &mut Frame, area: Rect, session: &Session) {
    let mut spans = vec![Span::styled(
        format!("  {}", Theme::LOGO),
        Style::default()
            .fg(Theme::WHITE)
            .add_modifier(Modifier::BOLD),
    )];
    spans.push(Span::raw("   "));

    for (i, mode) in ViewMode::ALL.iter().enumerate() {
        let style = if session.is_view_active(*mode) {
            Theme::tab_active()
        } else {
            Theme::tab_inactive()
        };
        spans.push(Span::styled(
            format!(" F{} {} ", i + 1, mode.label()),
            style,
        ));
        spans.push(Span::raw(" "));
    }

    if let Some(badge) = &session.user_badge {
        let used: usize = spans.iter().map(|s| s.content.width()).sum();
        let badge_width = badge.width() + 2;
        let spacer = (area.width as usize).saturating_sub(used + badge_width);
        spans.push(Span::raw(" ".repeat(spacer)));
        spans.push(Span::styled(badge.clone(), Theme::text_muted()));
    }

    let header = Paragraph::new(vec![Line::from(spans)]).style(Style::default().bg(Theme::BG));
    frame.render_widget(header, area);
}
