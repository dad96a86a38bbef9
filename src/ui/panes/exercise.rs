//! Code exercise panes: the source editor and the grading report
//!
//! The editor pane highlights the C subset with a small per-line tokenizer.
//! It works on `char`s throughout, so multi-byte text in comments or string
//! literals never splits a UTF-8 sequence.

use super::pane_block;
use crate::grader::GradeReport;
use crate::ui::editor::Editor;
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Width of the line-number gutter, including the trailing space
const GUTTER: u16 = 5;

fn collect(chars: &[char]) -> String {
    chars.iter().collect()
}

/// Simple syntax highlighting for the C subset
fn highlight_source_code<'a>(line: &str, theme: &Theme) -> Line<'a> {
    let mut spans = Vec::new();
    let mut current_word = String::new();

    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Comments and preprocessor lines run to the end of the line
        let rest_is_comment = c == '/' && chars.get(i + 1) == Some(&'/');
        let is_directive = c == '#' && chars[..i].iter().all(|c| c.is_whitespace());
        if rest_is_comment || is_directive {
            if !current_word.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_word)));
            }
            spans.push(Span::styled(
                collect(&chars[i..]),
                Style::default().fg(theme.comment),
            ));
            break;
        }

        if c == '"' {
            if !current_word.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_word)));
            }
            let mut end = i + 1;
            while end < chars.len() && chars[end] != '"' {
                end += if chars[end] == '\\' { 2 } else { 1 };
            }
            let end = (end + 1).min(chars.len());
            spans.push(Span::styled(
                collect(&chars[i..end]),
                Style::default().fg(theme.string),
            ));
            i = end;
            continue;
        }

        if !c.is_alphanumeric() && c != '_' {
            if !current_word.is_empty() {
                let word = std::mem::take(&mut current_word);
                let style = word_style(&word, c == '(', theme);
                spans.push(Span::styled(word, style));
            }

            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(theme.primary),
                _ => Style::default().fg(theme.fg),
            };
            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    if !current_word.is_empty() {
        let style = word_style(&current_word, false, theme);
        spans.push(Span::styled(current_word, style));
    }

    Line::from(spans)
}

fn word_style(word: &str, is_function: bool, theme: &Theme) -> Style {
    match word {
        "int" | "void" => Style::default().fg(theme.type_name),
        "const" | "return" | "if" | "else" | "while" | "for" | "do" | "break" | "continue" => {
            Style::default()
                .fg(theme.keyword)
                .add_modifier(Modifier::BOLD)
        }
        _ if word.starts_with(|c: char| c.is_ascii_digit()) => Style::default().fg(theme.number),
        _ if is_function => Style::default().fg(theme.function),
        _ => Style::default().fg(theme.fg),
    }
}

/// Render the editor and place the terminal cursor at the edit position
pub fn render_editor(frame: &mut Frame, area: Rect, editor: &mut Editor, theme: &Theme) {
    let block = pane_block(" bubble_sort.c ", true, theme);
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    let (row, col) = editor.cursor();

    // Scroll just enough to keep the cursor row visible
    if row < editor.scroll {
        editor.scroll = row;
    } else if row >= editor.scroll + visible_height {
        editor.scroll = row + 1 - visible_height;
    }

    let lines: Vec<Line> = editor
        .lines()
        .iter()
        .enumerate()
        .skip(editor.scroll)
        .take(visible_height)
        .map(|(idx, line)| {
            let num_style = if idx == row {
                Style::default()
                    .fg(theme.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.comment)
            };
            let mut content = highlight_source_code(line, theme);
            if idx == row {
                for span in &mut content.spans {
                    span.style = span.style.bg(theme.current_line_bg);
                }
            }
            let mut spans = vec![Span::styled(format!("{:4} ", idx + 1), num_style)];
            spans.extend(content.spans);
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);

    let max_x = area.x + area.width.saturating_sub(2);
    let x = (area.x + 1 + GUTTER).saturating_add(col as u16).min(max_x);
    let y = area.y + 1 + (row - editor.scroll) as u16;
    frame.set_cursor_position(Position::new(x, y));
}

/// Render the outcome of the last grading run
pub fn render_report(
    frame: &mut Frame,
    area: Rect,
    report: Option<&GradeReport>,
    random_input: bool,
    theme: &Theme,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Percentage(40)])
        .split(area);

    let label = Style::default().fg(theme.comment);
    let value = Style::default().fg(theme.fg);
    let input_mode = if random_input { "random" } else { "fixed" };

    let mut lines = vec![Line::from(vec![
        Span::styled("Input mode ", label),
        Span::styled(input_mode, value.add_modifier(Modifier::BOLD)),
    ])];

    match report {
        None => lines.push(Line::from(Span::styled(
            "Press Ctrl+R to run your bubble_sort against the tests.",
            value,
        ))),
        Some(report) => {
            let outcome_style = if report.passed() {
                Style::default()
                    .fg(theme.success)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.error).add_modifier(Modifier::BOLD)
            };
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                report.outcome.to_string(),
                outcome_style,
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("Input    ", label),
                Span::styled(format!("{:?}", report.input), value),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Expected ", label),
                Span::styled(format!("{:?}", report.expected), value),
            ]));
            let actual = match &report.actual {
                Some(actual) => format!("{:?}", actual),
                None => "-".to_string(),
            };
            lines.push(Line::from(vec![
                Span::styled("Actual   ", label),
                Span::styled(actual, value),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Fuel     ", label),
                Span::styled(report.fuel_used.to_string(), value),
            ]));
        }
    }

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(pane_block(" Test Results ", false, theme)),
        rows[0],
    );

    let mut console: Vec<Line> = report
        .map(|r| {
            r.console
                .iter()
                .map(|l| Line::from(Span::styled(l.clone(), value)))
                .collect()
        })
        .unwrap_or_default();
    if report.is_some_and(|r| r.console_truncated) {
        console.push(Line::from(Span::styled("[output truncated]", label)));
    }
    // Show the tail when output overflows the pane
    let visible = rows[1].height.saturating_sub(2) as usize;
    let skip = console.len().saturating_sub(visible);
    let console: Vec<Line> = console.into_iter().skip(skip).collect();
    frame.render_widget(
        Paragraph::new(console).block(pane_block(" Console ", false, theme)),
        rows[1],
    );
}
