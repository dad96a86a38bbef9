//! Bar chart shared by the demo and practice panes

use crate::ui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block},
    Frame,
};
use std::collections::BTreeSet;

/// Per-index emphasis for one bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum BarRole {
    Plain,
    Current,
    Compared,
    Sorted,
}

pub(super) fn bar_role(
    idx: usize,
    current: Option<usize>,
    compared: Option<usize>,
    sorted: &BTreeSet<usize>,
) -> BarRole {
    if current == Some(idx) {
        BarRole::Current
    } else if compared == Some(idx) {
        BarRole::Compared
    } else if sorted.contains(&idx) {
        BarRole::Sorted
    } else {
        BarRole::Plain
    }
}

/// Draw `values` as vertical bars inside `block`.
///
/// Heights are shifted so the smallest value still gets a visible bar,
/// which keeps negative inputs drawable.
pub(super) fn render_bars(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    values: &[i32],
    role: impl Fn(usize) -> BarRole,
    theme: &Theme,
) {
    let min = values.iter().copied().min().unwrap_or(0).min(0);
    let inner_width = area.width.saturating_sub(2) as usize;
    let count = values.len().max(1);
    let bar_width = (inner_width / count).saturating_sub(1).clamp(1, 9) as u16;

    let bars: Vec<Bar> = values
        .iter()
        .enumerate()
        .map(|(idx, &value)| {
            let color = match role(idx) {
                BarRole::Plain => theme.primary,
                BarRole::Current => theme.secondary,
                BarRole::Compared => theme.error,
                BarRole::Sorted => theme.success,
            };
            let height = (i64::from(value) - i64::from(min) + 1) as u64;
            Bar::default()
                .value(height)
                .text_value(value.to_string())
                .label(Line::from(idx.to_string()))
                .style(Style::default().fg(color))
                .value_style(
                    Style::default()
                        .bg(color)
                        .fg(theme.on_accent)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .label_style(Style::default().fg(theme.comment));
    frame.render_widget(chart, area);
}
