//! Tab bar and status bar rendering

use crate::ui::app::Tab;
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// State indicator shown at the right end of the status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Playing,
    Done,
    Passed,
    Failed,
    Loading,
}

impl Badge {
    fn label(self) -> &'static str {
        match self {
            Badge::Playing => " ▶ PLAYING ",
            Badge::Done => " ✓ SORTED ",
            Badge::Passed => " ✓ PASSED ",
            Badge::Failed => " ✗ FAILED ",
            Badge::Loading => " … LOADING ",
        }
    }
}

/// Render the tab strip; F1..F8 jump straight to a tab
pub fn render_tab_bar(frame: &mut Frame, area: Rect, selected: Tab, theme: &Theme) {
    let mut spans = Vec::new();
    for (idx, tab) in Tab::ALL.iter().enumerate() {
        let style = if *tab == selected {
            Style::default()
                .bg(theme.primary)
                .fg(theme.on_accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(theme.current_line_bg).fg(theme.fg)
        };
        spans.push(Span::styled(format!(" F{} {} ", idx + 1, tab.title()), style));
        spans.push(Span::styled(
            "│",
            Style::default().bg(theme.current_line_bg).fg(theme.comment),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(theme.current_line_bg))
        .alignment(Alignment::Left);
    frame.render_widget(paragraph, area);
}

/// Render the status bar at the bottom.
///
/// `hints` are `(key, description)` pairs for the active tab; the quit and
/// tab-switch hints are always appended.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    message: &str,
    hints: &[(&str, &str)],
    badge: Option<Badge>,
    theme: &Theme,
) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let is_error = matches!(badge, Some(Badge::Failed));
    let left_spans = vec![Span::styled(
        format!(" {} ", message),
        Style::default()
            .bg(theme.current_line_bg)
            .fg(if is_error { theme.error } else { theme.fg }),
    )];
    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(theme.current_line_bg))
        .alignment(Alignment::Left);
    frame.render_widget(left_paragraph, layout[0]);

    // Right side: Keybinds with visual grouping
    let key_style = Style::default().bg(theme.comment).fg(theme.on_accent);
    let desc_style = Style::default().bg(theme.current_line_bg).fg(theme.fg);
    let sep_style = Style::default().bg(theme.current_line_bg).fg(theme.comment);

    let mut right_spans = Vec::new();
    for (key, desc) in hints.iter().chain([("⇥", "tab"), ("^C", "quit")].iter()) {
        if !right_spans.is_empty() {
            right_spans.push(Span::styled("│", sep_style));
            right_spans.push(Span::styled(" ", desc_style));
        }
        right_spans.push(Span::styled(format!(" {} ", key), key_style));
        right_spans.push(Span::styled(format!(" {} ", desc), desc_style));
    }

    if let Some(badge) = badge {
        let bg = match badge {
            Badge::Playing | Badge::Loading => theme.secondary,
            Badge::Done | Badge::Passed => theme.success,
            Badge::Failed => theme.error,
        };
        right_spans.push(Span::styled("│", sep_style));
        right_spans.push(Span::styled(
            badge.label(),
            Style::default()
                .bg(bg)
                .fg(theme.on_accent)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(theme.current_line_bg))
        .alignment(Alignment::Right);
    frame.render_widget(right_paragraph, layout[1]);
}
