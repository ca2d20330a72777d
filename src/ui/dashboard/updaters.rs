//! Dashboard state update logic
//!
//! Contains all methods for updating dashboard state from events, the store
//! and key presses

use super::state::DashboardState;
use crate::refresh::{PageParams, PollInterval};
use crate::store::PendingTasksState;

impl DashboardState {
    /// Advance one frame: bump the tick and move queued events into the log.
    pub fn update(&mut self) {
        self.tick += 1;

        while let Some(event) = self.pending_events.pop_front() {
            self.add_to_activity_log(event);
        }
    }

    /// Take the latest pending-task state from the store. A new page replaces
    /// the previous one entirely; row state of tasks no longer shown is dropped.
    pub fn apply_pending(&mut self, pending: PendingTasksState) {
        if pending.latest_applied != self.pending.latest_applied {
            self.rows.retain_page(&pending.data);
        }
        self.pending = pending;
        self.clamp_selection();
    }

    pub fn set_page_params(&mut self, params: PageParams) {
        if params != self.page_params {
            self.page_params = params;
            self.selected = 0;
        }
    }

    pub fn set_poll_interval(&mut self, poll_interval: PollInterval) {
        self.poll_interval = poll_interval;
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.pending.data.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Expand or collapse the highlighted row. Returns the new expand state,
    /// or `None` when the page is empty.
    pub fn toggle_selected(&mut self) -> Option<bool> {
        let id = self.selected_task_id()?.to_string();
        Some(self.rows.toggle(&id))
    }

    fn clamp_selection(&mut self) {
        let len = self.pending.data.len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}
