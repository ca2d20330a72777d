//! Pending task rows
//!
//! One [`RowPresenter`] per task. Expand state lives in a [`RowArena`] keyed by
//! task id, so every row flips its own flag and nothing else.

use crate::api::PendingTask;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use serde_json::Value;
use std::collections::HashMap;

/// Shown in the retry columns, which are not wired to task data yet.
pub const PLACEHOLDER: &str = "-";

pub const ID_WIDTH: usize = 38;
pub const TYPE_WIDTH: usize = 24;
pub const RETRIED_WIDTH: usize = 8;
pub const MAX_RETRY_WIDTH: usize = 10;
pub const LAST_FAILED_WIDTH: usize = 12;
pub const LAST_ERROR_WIDTH: usize = 20;

/// Expand flag of one row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowState {
    expanded: bool,
}

impl RowState {
    pub fn is_expanded(self) -> bool {
        self.expanded
    }

    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }
}

/// Row states of the rows currently on screen.
#[derive(Debug, Default)]
pub struct RowArena {
    rows: HashMap<String, RowState>,
}

impl RowArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// State of `id`; rows never seen before are collapsed.
    pub fn get(&self, id: &str) -> RowState {
        self.rows.get(id).copied().unwrap_or_default()
    }

    #[cfg(test)]
    pub fn is_expanded(&self, id: &str) -> bool {
        self.get(id).is_expanded()
    }

    /// Flips the row and returns whether it is now expanded.
    pub fn toggle(&mut self, id: &str) -> bool {
        let row = self.rows.entry(id.to_string()).or_default();
        row.toggle();
        row.is_expanded()
    }

    /// Drops the state of every row not in `tasks`.
    pub fn retain_page(&mut self, tasks: &[PendingTask]) {
        self.rows
            .retain(|id, _| tasks.iter().any(|task| &task.id == id));
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Renders one task as a summary line plus, when expanded, its payload.
pub struct RowPresenter<'a> {
    task: &'a PendingTask,
    state: RowState,
    selected: bool,
}

impl<'a> RowPresenter<'a> {
    pub fn new(task: &'a PendingTask, state: RowState, selected: bool) -> Self {
        Self {
            task,
            state,
            selected,
        }
    }

    pub fn header_line() -> Line<'static> {
        let text = format!(
            "  {:<id$} {:>ty$} {:>re$} {:>mr$} {:>lf$} {:>le$} {}",
            "ID",
            "Type",
            "Retried",
            "Max Retry",
            "Last Failed",
            "Last Error",
            "Action",
            id = ID_WIDTH,
            ty = TYPE_WIDTH,
            re = RETRIED_WIDTH,
            mr = MAX_RETRY_WIDTH,
            lf = LAST_FAILED_WIDTH,
            le = LAST_ERROR_WIDTH,
        );
        Line::from(Span::styled(
            text,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
    }

    pub fn summary_line(&self) -> Line<'static> {
        let indicator = if self.state.is_expanded() { "▼" } else { "▶" };
        let columns = format!(
            "{:<id$} {:>ty$} {:>re$} {:>mr$} {:>lf$} {:>le$} ",
            truncate(&self.task.id, ID_WIDTH),
            truncate(&self.task.task_type, TYPE_WIDTH),
            PLACEHOLDER,
            PLACEHOLDER,
            PLACEHOLDER,
            PLACEHOLDER,
            id = ID_WIDTH,
            ty = TYPE_WIDTH,
            re = RETRIED_WIDTH,
            mr = MAX_RETRY_WIDTH,
            lf = LAST_FAILED_WIDTH,
            le = LAST_ERROR_WIDTH,
        );

        let base = if self.selected {
            Style::default().bg(Color::DarkGray).fg(Color::White)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::styled(format!("{} ", indicator), base.fg(Color::LightBlue)),
            Span::styled(columns, base),
            Span::styled("[Cancel]", base.fg(Color::DarkGray)),
        ])
    }

    /// Payload panel lines. Empty while collapsed; the payload is only
    /// formatted when the row is expanded.
    pub fn detail_lines(&self) -> Vec<Line<'static>> {
        if !self.state.is_expanded() {
            return Vec::new();
        }

        let mut lines = vec![Line::from(Span::styled(
            "    Payload",
            Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
        ))];
        lines.extend(format_payload(&self.task.payload).into_iter().map(|text| {
            Line::from(Span::styled(
                format!("      {}", text),
                Style::default().fg(Color::Gray),
            ))
        }));
        lines
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![self.summary_line()];
        lines.extend(self.detail_lines());
        lines
    }
}

/// Indented JSON, one entry per line.
pub fn format_payload(payload: &Value) -> Vec<String> {
    serde_json::to_string_pretty(payload)
        .unwrap_or_else(|_| payload.to_string())
        .lines()
        .map(str::to_string)
        .collect()
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
