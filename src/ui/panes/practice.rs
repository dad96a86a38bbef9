//! Practice pane: the learner performs the swaps

use super::bars::{render_bars, BarRole};
use super::pane_block;
use crate::sort::PracticeSession;
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Wrap},
    Frame,
};

pub fn render_practice(
    frame: &mut Frame,
    area: Rect,
    session: &PracticeSession,
    cursor: usize,
    theme: &Theme,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(5),
        ])
        .split(area);

    let complete = session.is_complete();
    render_bars(
        frame,
        rows[0],
        pane_block(" Swap the pair bubble sort swaps next ", !complete, theme),
        session.array(),
        |idx| {
            if complete || session.sorted().contains(&idx) {
                BarRole::Sorted
            } else if idx == cursor {
                BarRole::Current
            } else if idx == cursor + 1 {
                BarRole::Compared
            } else {
                BarRole::Plain
            }
        },
        theme,
    );

    let total = session.swaps_total();
    let ratio = if total == 0 {
        1.0
    } else {
        session.swaps_done() as f64 / total as f64
    };
    let gauge = Gauge::default()
        .block(pane_block(" Progress ", false, theme))
        .gauge_style(Style::default().fg(theme.success).bg(theme.current_line_bg))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!("{}/{} swaps", session.swaps_done(), total));
    frame.render_widget(gauge, rows[1]);

    let label = Style::default().fg(theme.comment);
    let mistakes_style = if session.mistakes() > 0 {
        Style::default().fg(theme.error).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.fg)
    };
    let text = vec![
        Line::from(vec![
            Span::styled("Selected pair ", label),
            Span::styled(
                format!("({}, {})", cursor, cursor + 1),
                Style::default().fg(theme.secondary).add_modifier(Modifier::BOLD),
            ),
            Span::styled("   Mistakes ", label),
            Span::styled(session.mistakes().to_string(), mistakes_style),
        ]),
        Line::from(Span::styled(
            if complete {
                "Sorted! Press r to try again or g for a new array."
            } else {
                "Swap the next out-of-order pair that the current pass reaches."
            },
            Style::default().fg(theme.fg),
        )),
    ];
    frame.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .block(pane_block(" Status ", false, theme)),
        rows[2],
    );
}
