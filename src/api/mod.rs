use crate::api::error::ApiError;

pub(crate) mod client;
pub use client::ApiClient;
pub mod error;
pub mod types;

pub use types::{ListPendingTasksResponse, PageOptions, PendingTask, QueueStats};

#[cfg(test)]
use mockall::{automock, predicate::*};

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait TaskQueueApi: Send + Sync {
    /// List one page of the pending tasks of a queue.
    async fn list_pending_tasks(
        &self,
        queue: &str,
        page: PageOptions,
    ) -> Result<ListPendingTasksResponse, ApiError>;
}
