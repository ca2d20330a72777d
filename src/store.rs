//! Shared application state
//!
//! An observable container for the data the views consume. Writers go through
//! the mutation methods; readers either take a snapshot or subscribe to
//! change notifications and read through the `select_*` functions.

use crate::api::{ListPendingTasksResponse, PendingTask, QueueStats};
use crate::refresh::PollInterval;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

/// Pending-task list of the watched queue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingTasksState {
    pub loading: bool,
    pub data: Vec<PendingTask>,
    /// Message of the last failed fetch, cleared by the next success.
    pub error: Option<String>,
    pub stats: Option<QueueStats>,
    /// Sequence number of the newest request issued.
    pub latest_requested: u64,
    /// Sequence number of the newest response written into this state.
    pub latest_applied: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub poll_interval: PollInterval,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub pending_tasks: PendingTasksState,
    pub settings: Settings,
}

pub fn select_pending_tasks(state: &AppState) -> &PendingTasksState {
    &state.pending_tasks
}

pub fn select_poll_interval(state: &AppState) -> PollInterval {
    state.settings.poll_interval
}

pub fn select_queue_stats(state: &AppState) -> Option<&QueueStats> {
    state.pending_tasks.stats.as_ref()
}

/// What a successful fetch did to the shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A newer response was already applied. Nothing changed.
    Stale,
    Applied,
    /// Applied, and cleared the error left by an earlier failed fetch.
    Recovered,
}

/// Cheap-to-clone handle to the shared state.
#[derive(Debug, Clone)]
pub struct Store {
    tx: Arc<watch::Sender<AppState>>,
    next_seq: Arc<AtomicU64>,
}

impl Store {
    pub fn new(poll_interval: PollInterval) -> Self {
        let initial = AppState {
            pending_tasks: PendingTasksState::default(),
            settings: Settings { poll_interval },
        };
        let (tx, _rx) = watch::channel(initial);
        Self {
            tx: Arc::new(tx),
            next_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> AppState {
        self.tx.borrow().clone()
    }

    #[cfg(test)]
    pub fn set_poll_interval(&self, poll_interval: PollInterval) {
        self.tx.send_if_modified(|state| {
            if state.settings.poll_interval == poll_interval {
                return false;
            }
            state.settings.poll_interval = poll_interval;
            true
        });
    }

    /// Marks a fetch as in flight and returns its sequence number.
    pub fn fetch_started(&self) -> u64 {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.tx.send_modify(|state| {
            let pending = &mut state.pending_tasks;
            pending.latest_requested = pending.latest_requested.max(seq);
            pending.loading = true;
        });
        seq
    }

    /// Replaces the item list with `response`, unless a newer response has
    /// already been applied.
    pub fn fetch_succeeded(&self, seq: u64, response: ListPendingTasksResponse) -> FetchOutcome {
        let mut outcome = FetchOutcome::Stale;
        self.tx.send_if_modified(|state| {
            let pending = &mut state.pending_tasks;
            if seq < pending.latest_applied {
                return false;
            }
            outcome = match pending.error.take() {
                Some(_) => FetchOutcome::Recovered,
                None => FetchOutcome::Applied,
            };
            pending.data = response.tasks;
            pending.stats = Some(response.stats);
            pending.latest_applied = seq;
            pending.loading = seq < pending.latest_requested;
            true
        });
        outcome
    }

    /// Records a failed fetch. Items from the last success are kept.
    pub fn fetch_failed(&self, seq: u64, message: String) -> bool {
        self.tx.send_if_modified(|state| {
            let pending = &mut state.pending_tasks;
            if seq < pending.latest_applied {
                return false;
            }
            pending.error = Some(message);
            pending.latest_applied = seq;
            pending.loading = seq < pending.latest_requested;
            true
        })
    }
}
