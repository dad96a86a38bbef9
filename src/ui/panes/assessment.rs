//! Pretest, quiz and posttest pane

use super::pane_block;
use crate::ui::app::AssessmentView;
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn render_assessment(frame: &mut Frame, area: Rect, view: &AssessmentView, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);

    let session = &view.session;
    let questions = session.questions();

    let items: Vec<ListItem> = questions
        .iter()
        .enumerate()
        .map(|(idx, _)| {
            let (marker, marker_style) = match session.is_correct(idx) {
                Some(true) => ("✓", Style::default().fg(theme.success)),
                Some(false) => ("✗", Style::default().fg(theme.error)),
                None if session.selection(idx).is_some() => {
                    ("●", Style::default().fg(theme.primary))
                }
                None => ("○", Style::default().fg(theme.comment)),
            };
            let text_style = if idx == view.question {
                Style::default()
                    .bg(theme.current_line_bg)
                    .fg(theme.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.fg)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", marker), marker_style),
                Span::styled(format!("Question {}", idx + 1), text_style),
            ]))
        })
        .collect();

    let summary = match session.score() {
        Some(score) => format!(" {} · {}/{} ", view.kind.title(), score, questions.len()),
        None => format!(
            " {} · {}/{} answered ",
            view.kind.title(),
            session.answered(),
            questions.len()
        ),
    };
    frame.render_widget(
        List::new(items).block(pane_block(&summary, false, theme)),
        columns[0],
    );

    let Some(question) = questions.get(view.question) else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            question.text,
            Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    let selected = session.selection(view.question);
    for (idx, option) in question.options.iter().enumerate() {
        let chosen = selected == Some(idx);
        let style = if session.is_submitted() && idx == question.correct {
            Style::default()
                .fg(theme.success)
                .add_modifier(Modifier::BOLD)
        } else if session.is_submitted() && chosen {
            Style::default().fg(theme.error)
        } else if chosen {
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.fg)
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {} {}. ", if chosen { "▸" } else { " " }, idx + 1),
                Style::default().fg(theme.comment),
            ),
            Span::styled(*option, style),
        ]));
    }

    if session.is_submitted() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            question.explanation,
            Style::default()
                .fg(theme.comment)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let title = format!(" {} of {} ", view.question + 1, questions.len());
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(pane_block(&title, true, theme)),
        columns[1],
    );
}
