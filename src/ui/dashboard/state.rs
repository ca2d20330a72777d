//! Dashboard state management
//!
//! Contains the main dashboard state struct

use crate::consts::cli_consts::MAX_ACTIVITY_LOGS;
use crate::environment::Environment;
use crate::events::Event as WorkerEvent;
use crate::refresh::{PageParams, PollInterval};
use crate::store::PendingTasksState;
use crate::ui::app::UIConfig;
use crate::ui::dashboard::components::rows::RowArena;

use std::collections::VecDeque;

/// Everything the pending-tasks dashboard needs to draw one frame.
#[derive(Debug)]
pub struct DashboardState {
    /// Queue whose pending tasks are shown.
    pub queue_name: String,
    /// The environment in which the application is running.
    pub environment: Environment,
    /// Period of the automatic refresh.
    pub poll_interval: PollInterval,
    /// Page currently requested by the refresh controller.
    pub page_params: PageParams,
    /// Latest pending-task state from the store.
    pub pending: PendingTasksState,
    /// Expand state of the visible rows.
    pub rows: RowArena,
    /// Index of the highlighted row within the current page.
    pub selected: usize,
    /// Queue of events waiting to be processed
    pub pending_events: VecDeque<WorkerEvent>,
    /// Activity logs for display
    pub activity_logs: VecDeque<WorkerEvent>,
    /// Whether to enable background colors
    pub with_background_color: bool,
    /// Animation tick counter
    pub tick: usize,
}

impl DashboardState {
    /// Creates a new instance of the dashboard state.
    pub fn new(
        queue_name: String,
        environment: Environment,
        ui_config: UIConfig,
    ) -> Self {
        Self {
            queue_name,
            environment,
            poll_interval: ui_config.poll_interval,
            page_params: ui_config.page_params,
            pending: PendingTasksState::default(),
            rows: RowArena::new(),
            selected: 0,
            pending_events: VecDeque::new(),
            activity_logs: VecDeque::new(),
            with_background_color: ui_config.with_background_color,
            tick: 0,
        }
    }

    /// Total number of pending tasks in the queue, as last reported.
    pub fn total_item_count(&self) -> u64 {
        self.pending.stats.as_ref().map_or(0, |s| s.pending)
    }

    /// Id of the highlighted task, if the page has any.
    pub fn selected_task_id(&self) -> Option<&str> {
        self.pending
            .data
            .get(self.selected)
            .map(|task| task.id.as_str())
    }

    /// Add an event to activity logs with size limit
    pub fn add_to_activity_log(&mut self, event: WorkerEvent) {
        if self.activity_logs.len() >= MAX_ACTIVITY_LOGS {
            self.activity_logs.pop_front();
        }
        self.activity_logs.push_back(event);
    }

    /// Add an event to the processing queue
    pub fn add_event(&mut self, event: WorkerEvent) {
        self.pending_events.push_back(event);
    }
}
