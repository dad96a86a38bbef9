//! Demo pane: animated bubble sort with a trace listing

use super::bars::{bar_role, render_bars};
use super::pane_block;
use crate::sort::{Step, StepPlayer};
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

pub fn render_demo(frame: &mut Frame, area: Rect, player: &StepPlayer, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(0)])
        .split(columns[1]);

    let highlight = player.highlight();
    let title = if player.options().early_exit {
        " Bubble Sort (early exit) "
    } else {
        " Bubble Sort "
    };
    render_bars(
        frame,
        columns[0],
        pane_block(title, true, theme),
        player.array(),
        |idx| bar_role(idx, highlight.current, highlight.compared, player.sorted()),
        theme,
    );

    let label = Style::default().fg(theme.comment);
    let value = Style::default().fg(theme.fg).add_modifier(Modifier::BOLD);
    let info = vec![
        Line::from(vec![
            Span::styled("Step        ", label),
            Span::styled(
                format!("{}/{}", player.cursor(), player.steps().len()),
                value,
            ),
        ]),
        Line::from(vec![
            Span::styled("Comparisons ", label),
            Span::styled(player.comparisons().to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("Swaps       ", label),
            Span::styled(player.swaps().to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("Interval    ", label),
            Span::styled(format!("{} ms", player.interval().as_millis()), value),
        ]),
        Line::from(vec![
            Span::styled("Original    ", label),
            Span::styled(format!("{:?}", player.original()), value),
        ]),
        Line::from(vec![Span::styled(
            describe(player.last_step(), player.array()),
            Style::default().fg(theme.secondary),
        )]),
    ];
    frame.render_widget(
        Paragraph::new(info).block(pane_block(" Progress ", false, theme)),
        right[0],
    );

    // Keep the last applied step in view
    let visible = right[1].height.saturating_sub(2).max(1) as usize;
    let offset = player.cursor().saturating_sub(visible / 2);
    let items: Vec<ListItem> = player
        .steps()
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(idx, step)| {
            let style = if idx + 1 == player.cursor() {
                Style::default()
                    .bg(theme.current_line_bg)
                    .fg(theme.secondary)
                    .add_modifier(Modifier::BOLD)
            } else if idx < player.cursor() {
                Style::default().fg(theme.fg)
            } else {
                Style::default().fg(theme.comment)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:4} ", idx + 1), Style::default().fg(theme.comment)),
                Span::styled(step.to_string(), style),
            ]))
        })
        .collect();
    frame.render_widget(
        List::new(items).block(pane_block(" Trace ", false, theme)),
        right[1],
    );
}

/// One-line narration of the step that was just applied
fn describe(step: Option<Step>, array: &[i32]) -> String {
    let at = |i: usize| array.get(i).copied().unwrap_or_default();
    match step {
        None => "Press Space to start".to_string(),
        Some(Step::Compare(i, j)) => format!("Is {} > {}?", at(i), at(j)),
        Some(Step::Swap(i, j)) => format!("Swapped: {} now before {}", at(i), at(j)),
        Some(Step::MarkSorted(i)) => format!("{} is in its final place", at(i)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_reads_current_values() {
        let array = [3, 5, 8];
        assert_eq!(describe(Some(Step::Compare(0, 1)), &array), "Is 3 > 5?");
        assert_eq!(
            describe(Some(Step::Swap(0, 1)), &array),
            "Swapped: 3 now before 5"
        );
        assert_eq!(
            describe(Some(Step::MarkSorted(2)), &array),
            "8 is in its final place"
        );
        assert_eq!(describe(None, &array), "Press Space to start");
    }
}
