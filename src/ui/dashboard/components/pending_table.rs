//! Pending tasks table component
//!
//! Renders the current page as a header, one row per task (with payload
//! panels for expanded rows) and a pagination footer. An empty page renders
//! an informational message instead, without pagination.

use super::super::state::DashboardState;
use super::rows::RowPresenter;
use crate::refresh::{PageParams, PageSize};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph};

pub const EMPTY_MESSAGE: &str = "No pending tasks at this time.";

/// Inputs the table takes from its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTableProps<'a> {
    pub queue_name: &'a str,
    pub total_item_count: u64,
}

impl<'a> From<&'a DashboardState> for PendingTableProps<'a> {
    fn from(state: &'a DashboardState) -> Self {
        Self {
            queue_name: &state.queue_name,
            total_item_count: state.total_item_count(),
        }
    }
}

/// Body lines of the table and the line index of the highlighted row.
fn body_lines(state: &DashboardState) -> (Vec<Line<'static>>, usize) {
    let mut lines = Vec::new();
    let mut selected_line = 0;
    for (index, task) in state.pending.data.iter().enumerate() {
        let selected = index == state.selected;
        if selected {
            selected_line = lines.len();
        }
        let row = RowPresenter::new(task, state.rows.get(&task.id), selected);
        lines.extend(row.lines());
    }
    (lines, selected_line)
}

/// "Rows per page: 20 (10/20/30/60/100) | 1-20 of 45 | page 1/3"
pub fn pagination_text(params: PageParams, total: u64) -> String {
    let options: Vec<String> = PageSize::options().map(|s| s.to_string()).collect();
    let range = match params.item_range(total) {
        Some((first, last)) => format!("{}-{} of {}", first, last, total),
        None => format!("0 of {}", total),
    };
    format!(
        "Rows per page: {} ({}) | {} | page {}/{}",
        params.page_size,
        options.join("/"),
        range,
        params.page_index + 1,
        params.page_count(total)
    )
}

pub fn render_pending_table(f: &mut Frame, area: Rect, state: &DashboardState) {
    let props = PendingTableProps::from(state);
    let title = format!("PENDING TASKS: {}", props.queue_name);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::horizontal(1));

    if state.pending.data.is_empty() {
        let message = Paragraph::new(vec![
            Line::from(Span::styled(
                "Info",
                Style::default()
                    .fg(Color::LightBlue)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(EMPTY_MESSAGE),
        ])
        .block(block);
        f.render_widget(message, area);
        return;
    }

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .split(inner);

    f.render_widget(Paragraph::new(RowPresenter::header_line()), chunks[0]);

    let (lines, selected_line) = body_lines(state);
    let height = chunks[1].height as usize;
    let scroll = if height > 0 && selected_line >= height {
        selected_line + 1 - height
    } else {
        0
    };
    f.render_widget(
        Paragraph::new(lines).scroll((scroll as u16, 0)),
        chunks[1],
    );

    let footer = Paragraph::new(pagination_text(
        state.page_params,
        props.total_item_count,
    ))
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{PendingTask, QueueStats};
    use crate::environment::Environment;
    use crate::refresh::PollInterval;
    use crate::store::PendingTasksState;
    use crate::ui::app::UIConfig;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use serde_json::json;

    fn dashboard(ids: &[&str], total: u64) -> DashboardState {
        let mut state = DashboardState::new(
            "default".to_string(),
            Environment::Local,
            UIConfig::new(false, PollInterval::from_secs(5).unwrap(), PageParams::default()),
        );
        state.apply_pending(PendingTasksState {
            data: ids
                .iter()
                .map(|id| PendingTask {
                    id: id.to_string(),
                    task_type: "email:welcome".to_string(),
                    payload: json!({ "to": "someone@example.com" }),
                    queue: "default".to_string(),
                    retried: 0,
                    max_retry: 25,
                    last_failed_at: None,
                    error_message: None,
                })
                .collect(),
            stats: Some(QueueStats {
                pending: total,
                ..QueueStats::default()
            }),
            latest_requested: 1,
            latest_applied: 1,
            ..PendingTasksState::default()
        });
        state
    }

    fn render(state: &DashboardState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 24)).unwrap();
        terminal
            .draw(|f| render_pending_table(f, f.area(), state))
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn empty_page_shows_message_without_table() {
        let screen = render(&dashboard(&[], 0));
        assert!(screen.contains(EMPTY_MESSAGE));
        assert!(!screen.contains("Rows per page"));
        assert!(!screen.contains("Max Retry"));
    }

    #[test]
    fn page_renders_header_rows_and_footer() {
        let screen = render(&dashboard(&["task-1", "task-2"], 45));
        assert!(screen.contains("PENDING TASKS: default"));
        assert!(screen.contains("Max Retry"));
        assert!(screen.contains("task-1"));
        assert!(screen.contains("task-2"));
        assert!(screen.contains("Rows per page: 20 (10/20/30/60/100) | 1-20 of 45 | page 1/3"));
    }

    #[test]
    fn payload_is_rendered_only_for_expanded_rows() {
        let mut state = dashboard(&["task-1", "task-2"], 2);
        assert!(!render(&state).contains("Payload"));

        state.toggle_selected();
        let screen = render(&state);
        assert!(screen.contains("Payload"));
        assert!(screen.contains("\"to\": \"someone@example.com\""));

        state.toggle_selected();
        assert!(!render(&state).contains("Payload"));
    }

    #[test]
    fn props_come_from_dashboard_state() {
        let state = dashboard(&["a"], 7);
        let props = PendingTableProps::from(&state);
        assert_eq!(
            props,
            PendingTableProps {
                queue_name: "default",
                total_item_count: 7
            }
        );
    }

    #[test]
    fn pagination_text_for_empty_and_last_pages() {
        let params = PageParams::new(2, PageSize::new(20).unwrap());
        assert_eq!(
            pagination_text(params, 45),
            "Rows per page: 20 (10/20/30/60/100) | 41-45 of 45 | page 3/3"
        );
        assert_eq!(
            pagination_text(PageParams::default(), 0),
            "Rows per page: 20 (10/20/30/60/100) | 0 of 0 | page 1/1"
        );
    }
}
