//! Lab assistant chat pane

use super::pane_block;
use crate::assistant::Assistant;
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

pub fn render_assistant(
    frame: &mut Frame,
    area: Rect,
    assistant: &Assistant,
    input: &str,
    theme: &Theme,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let mut lines = vec![Line::from(Span::styled(
        "Ask about bubble sort: passes, swaps, complexity, stability, the exercise...",
        Style::default().fg(theme.comment),
    ))];
    for exchange in assistant.history() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(
                "you ",
                Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(exchange.question.clone(), Style::default().fg(theme.fg)),
        ]));
        lines.push(Line::from(vec![
            Span::styled(
                "lab ",
                Style::default()
                    .fg(theme.success)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(exchange.answer, Style::default().fg(theme.fg)),
        ]));
    }

    // Stick to the bottom of the conversation; wrapped lines may push the
    // oldest ones further up, which is fine
    let visible = rows[0].height.saturating_sub(2) as usize;
    let skip = lines.len().saturating_sub(visible);
    let lines: Vec<Line> = lines.into_iter().skip(skip).collect();
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(pane_block(" Lab Assistant ", false, theme)),
        rows[0],
    );

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("> ", Style::default().fg(theme.secondary)),
            Span::styled(input, Style::default().fg(theme.fg)),
        ]))
        .block(pane_block(" Question ", true, theme)),
        rows[1],
    );

    let max_x = rows[1].x + rows[1].width.saturating_sub(2);
    let x = (rows[1].x + 3)
        .saturating_add(input.chars().count() as u16)
        .min(max_x);
    frame.set_cursor_position(Position::new(x, rows[1].y + 1));
}
