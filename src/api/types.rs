//! Wire types of the monitoring API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A task waiting in a queue to be processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingTask {
    pub id: String,
    #[serde(rename = "type")]
    pub task_type: String,
    #[serde(default)]
    pub payload: serde_json::Value,
    #[serde(default)]
    pub queue: String,
    #[serde(default)]
    pub retried: u32,
    #[serde(default)]
    pub max_retry: u32,
    #[serde(default)]
    pub last_failed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Queue-level counters returned alongside a page of tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueStats {
    pub queue: String,
    pub size: u64,
    pub pending: u64,
    pub active: u64,
    pub scheduled: u64,
    pub retry: u64,
    pub dead: u64,
    pub paused: bool,
}

/// Body of `GET /api/queues/{queue}/pending_tasks`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListPendingTasksResponse {
    #[serde(default)]
    pub tasks: Vec<PendingTask>,
    #[serde(default)]
    pub stats: QueueStats,
}

/// Page options as sent to the API. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageOptions {
    pub page: usize,
    pub size: usize,
}
