//! Dashboard header component
//!
//! Renders the title and the refresh status gauge

use super::super::state::DashboardState;
use crate::environment::Environment;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

/// Status shown in the gauge label: queue, environment, refresh state.
pub fn status_text(state: &DashboardState) -> String {
    let refresh = if state.pending.error.is_some() {
        "STALE - last refresh failed".to_string()
    } else if state.pending.loading {
        "LOADING".to_string()
    } else {
        format!("REFRESHING every {}", state.poll_interval)
    };

    let counts = match &state.pending.stats {
        Some(stats) => format!(
            "pending {} | active {} | scheduled {} | retry {} | dead {}",
            stats.pending, stats.active, stats.scheduled, stats.retry, stats.dead
        ),
        None => "no stats yet".to_string(),
    };

    let paused = if state.pending.stats.as_ref().is_some_and(|s| s.paused) {
        " | PAUSED"
    } else {
        ""
    };

    format!(
        "Queue: {} | Env: {} | {} | {}{}",
        state.queue_name, state.environment, counts, refresh, paused
    )
}

/// Render header with title and refresh status.
pub fn render_header(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let header_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let version = env!("CARGO_PKG_VERSION");
    let title_color = match state.environment {
        Environment::Local => Color::Cyan,
        Environment::Custom { .. } => Color::LightYellow,
    };
    let title = Paragraph::new(format!("QUEUE MONITOR v{}", version))
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(title_color)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_type(BorderType::Thick),
        );
    f.render_widget(title, header_chunks[0]);

    // Animated while a fetch is in flight, full otherwise
    let (gauge_color, progress_percent) = if state.pending.error.is_some() {
        (Color::LightRed, 100)
    } else if state.pending.loading {
        (Color::LightGreen, ((state.tick % 20) as f64 / 20.0 * 100.0) as u16)
    } else {
        (Color::LightBlue, 100)
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .gauge_style(
            Style::default()
                .fg(gauge_color)
                .add_modifier(Modifier::BOLD),
        )
        .percent(progress_percent)
        .label(status_text(state));
    f.render_widget(gauge, header_chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::QueueStats;
    use crate::refresh::{PageParams, PollInterval};
    use crate::ui::app::UIConfig;

    fn dashboard() -> DashboardState {
        DashboardState::new(
            "critical".to_string(),
            Environment::Local,
            UIConfig::new(false, PollInterval::from_secs(8).unwrap(), PageParams::default()),
        )
    }

    #[test]
    fn status_reflects_refresh_state() {
        let mut state = dashboard();
        assert!(status_text(&state).contains("no stats yet"));
        assert!(status_text(&state).ends_with("REFRESHING every 8s"));

        state.pending.loading = true;
        assert!(status_text(&state).contains("LOADING"));

        state.pending.error = Some("Request timed out".to_string());
        assert!(status_text(&state).contains("STALE"));
    }

    #[test]
    fn status_includes_queue_counts() {
        let mut state = dashboard();
        state.pending.stats = Some(QueueStats {
            queue: "critical".to_string(),
            pending: 12,
            active: 3,
            paused: true,
            ..QueueStats::default()
        });
        let text = status_text(&state);
        assert!(text.starts_with("Queue: critical | Env: Local"));
        assert!(text.contains("pending 12 | active 3"));
        assert!(text.ends_with("| PAUSED"));
    }
}
