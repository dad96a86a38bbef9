//! Experiment catalogue pane

use super::pane_block;
use crate::catalog::{CatalogTab, Experiment};
use crate::prefs::PreferenceStore;
use crate::ui::app::{CatalogData, CatalogView};
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Experiments after the persisted filters and the active tab are applied
pub fn visible_experiments<'a>(
    catalog: &'a CatalogView,
    prefs: &PreferenceStore,
) -> Vec<&'a Experiment> {
    let Some(data) = catalog.data.as_ref() else {
        return Vec::new();
    };
    let filtered = prefs.filters().apply(&data.experiments);
    prefs.active_tab().select(filtered, prefs.starred())
}

fn rating_stars(rating: f32) -> String {
    let full = rating.round().clamp(0.0, 5.0) as usize;
    format!("{}{}", "★".repeat(full), "☆".repeat(5 - full))
}

pub fn render_catalog(
    frame: &mut Frame,
    area: Rect,
    catalog: &CatalogView,
    prefs: &PreferenceStore,
    theme: &Theme,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);

    render_toolbar(frame, rows[0], catalog, prefs, theme);

    let Some(data) = catalog.data.as_ref() else {
        frame.render_widget(
            Paragraph::new("Loading experiments...")
                .style(Style::default().fg(theme.comment))
                .block(pane_block(" Experiments ", true, theme)),
            rows[1],
        );
        return;
    };

    let visible = visible_experiments(catalog, prefs);
    let height = columns[0].height.saturating_sub(2).max(1) as usize;
    let offset = (catalog.selected + 1).saturating_sub(height);
    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(idx, experiment)| {
            let star = if prefs.is_starred(&experiment.id) { "★ " } else { "  " };
            let title_style = if idx == catalog.selected {
                Style::default()
                    .bg(theme.current_line_bg)
                    .fg(theme.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.fg)
            };
            ListItem::new(Line::from(vec![
                Span::styled(star, Style::default().fg(theme.secondary)),
                Span::styled(experiment.title.clone(), title_style),
                Span::styled(
                    format!("  {:.1}", experiment.rating),
                    Style::default().fg(theme.comment),
                ),
            ]))
        })
        .collect();

    let title = format!(
        " {} · {} of {} ",
        prefs.active_tab(),
        visible.len(),
        data.experiments.len()
    );
    let list = if items.is_empty() {
        List::new(vec![ListItem::new(Span::styled(
            "No experiments match",
            Style::default().fg(theme.comment),
        ))])
    } else {
        List::new(items)
    };
    frame.render_widget(list.block(pane_block(&title, true, theme)), columns[0]);

    render_detail(
        frame,
        columns[1],
        data,
        visible.get(catalog.selected).copied(),
        catalog,
        theme,
    );
}

fn render_toolbar(
    frame: &mut Frame,
    area: Rect,
    catalog: &CatalogView,
    prefs: &PreferenceStore,
    theme: &Theme,
) {
    let mut spans = Vec::new();
    for tab in CatalogTab::ALL {
        let style = if tab == prefs.active_tab() {
            Style::default()
                .bg(theme.primary)
                .fg(theme.on_accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.fg)
        };
        spans.push(Span::styled(format!(" {} ", tab), style));
        spans.push(Span::raw(" "));
    }

    let filters = prefs.filters();
    let query_style = if catalog.searching {
        Style::default()
            .fg(theme.secondary)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.fg)
    };
    spans.push(Span::styled("│ search: ", Style::default().fg(theme.comment)));
    spans.push(Span::styled(
        format!("{}{}", filters.query, if catalog.searching { "▏" } else { "" }),
        query_style,
    ));

    if let Some(data) = catalog.data.as_ref() {
        if !filters.institutes.is_empty() {
            spans.push(Span::styled(" │ institutes: ", Style::default().fg(theme.comment)));
            spans.push(Span::styled(
                filters
                    .institutes
                    .iter()
                    .map(|id| data.institute_name(id))
                    .collect::<Vec<_>>()
                    .join(", "),
                Style::default().fg(theme.type_name),
            ));
        }
        if !filters.disciplines.is_empty() {
            spans.push(Span::styled(" │ disciplines: ", Style::default().fg(theme.comment)));
            spans.push(Span::styled(
                filters
                    .disciplines
                    .iter()
                    .map(|id| data.discipline_name(id))
                    .collect::<Vec<_>>()
                    .join(", "),
                Style::default().fg(theme.type_name),
            ));
        }
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(pane_block(" Browse ", catalog.searching, theme)),
        area,
    );
}

fn render_detail(
    frame: &mut Frame,
    area: Rect,
    data: &CatalogData,
    selected: Option<&Experiment>,
    catalog: &CatalogView,
    theme: &Theme,
) {
    let block = pane_block(" Details ", false, theme);
    let Some(experiment) = selected else {
        frame.render_widget(Paragraph::new("").block(block), area);
        return;
    };

    let label = Style::default().fg(theme.comment);
    let value = Style::default().fg(theme.fg);
    let mut lines = vec![
        Line::from(Span::styled(
            experiment.title.clone(),
            Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} {:.1}", rating_stars(experiment.rating), experiment.rating),
            Style::default().fg(theme.secondary),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Institute  ", label),
            Span::styled(data.institute_name(&experiment.institute).to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("Discipline ", label),
            Span::styled(data.discipline_name(&experiment.discipline).to_string(), value),
        ]),
        Line::from(""),
    ];

    // The full record arrives from a separate lookup
    match catalog.detail.as_ref().filter(|d| d.id == experiment.id) {
        Some(detail) => {
            lines.push(Line::from(Span::styled(detail.description.clone(), value)));
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("Added      ", label),
                Span::styled(detail.created_at.format("%Y-%m-%d").to_string(), value),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Image      ", label),
                Span::styled(detail.image.clone(), value),
            ]));
        }
        None if catalog.is_loading_detail() => {
            lines.push(Line::from(Span::styled("Loading details...", label)));
        }
        None => {
            lines.push(Line::from(Span::styled("Press Enter for details", label)));
        }
    }

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_stars() {
        assert_eq!(rating_stars(4.4), "★★★★☆");
        assert_eq!(rating_stars(0.0), "☆☆☆☆☆");
        assert_eq!(rating_stars(9.0), "★★★★★");
    }
}
