//! TUI pane rendering modules
//!
//! Each module exports one `render_*` function that draws a tab (or part of
//! one) from borrowed application state. Panes never mutate state, except
//! the editor's scroll offset, which depends on the pane height.
//!
//! # Pane Modules
//!
//! - [`demo`]: animated bar chart, progress counters and the step trace
//! - [`practice`]: learner-driven swaps with a progress gauge
//! - [`exercise`]: syntax-highlighted editor and the grading report
//! - [`assessment`]: pretest, quiz and posttest questions
//! - [`catalog`]: experiment list, filters and details
//! - [`assistant`]: chat history and the question input
//! - [`status`]: tab strip and status bar with keybindings
//! - `bars`: bar chart shared by the demo and practice panes

mod bars;

pub mod assessment;
pub mod assistant;
pub mod catalog;
pub mod demo;
pub mod exercise;
pub mod practice;
pub mod status;

pub use assessment::render_assessment;
pub use assistant::render_assistant;
pub use catalog::{render_catalog, visible_experiments};
pub use demo::render_demo;
pub use exercise::{render_editor, render_report};
pub use practice::render_practice;
pub use status::{render_status_bar, render_tab_bar, Badge};

use crate::ui::theme::Theme;
use ratatui::{
    style::{Modifier, Style},
    widgets::{Block, Borders},
};

/// Bordered block; the focused pane gets the highlighted border
fn pane_block<'a>(title: &'a str, is_focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default()
            .fg(theme.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
        .style(Style::default().bg(theme.bg).fg(theme.fg))
}
