//! Data provider used by the refresh controller
//!
//! The controller only needs two capabilities: ask for a page, and read back
//! what is currently known. [`StoreProvider`] implements them on top of the
//! monitoring API and the shared [`Store`].

use crate::api::{PageOptions, TaskQueueApi};
use crate::error_classifier::ErrorClassifier;
use crate::events::{EventSender, EventType};
use crate::logging::LogLevel;
use crate::store::{FetchOutcome, PendingTasksState, Store};
use log::debug;
use std::sync::Arc;

pub trait PendingDataProvider: Send + Sync {
    /// Start fetching one page. Returns immediately; the result lands in
    /// shared state.
    fn request_page(&self, queue: &str, page: PageOptions);

    /// Current loading flag and items.
    fn pending_tasks(&self) -> PendingTasksState;
}

pub struct StoreProvider {
    api: Arc<dyn TaskQueueApi>,
    store: Store,
    events: EventSender,
    classifier: ErrorClassifier,
}

impl StoreProvider {
    pub fn new(api: Arc<dyn TaskQueueApi>, store: Store, events: EventSender) -> Self {
        Self {
            api,
            store,
            events,
            classifier: ErrorClassifier::new(),
        }
    }
}

impl PendingDataProvider for StoreProvider {
    fn request_page(&self, queue: &str, page: PageOptions) {
        let seq = self.store.fetch_started();
        let api = Arc::clone(&self.api);
        let store = self.store.clone();
        let events = self.events.clone();
        let classifier = self.classifier.clone();
        let queue = queue.to_string();

        debug!(
            "fetching pending tasks of '{}' (page {}, size {}, seq {})",
            queue, page.page, page.size, seq
        );

        tokio::spawn(async move {
            match api.list_pending_tasks(&queue, page).await {
                Ok(response) => {
                    let count = response.tasks.len();
                    let (msg, event_type, log_level) = match store.fetch_succeeded(seq, response) {
                        FetchOutcome::Applied => (
                            format!(
                                "Loaded {} pending tasks of '{}' (page {}, size {})",
                                count, queue, page.page, page.size
                            ),
                            EventType::Refresh,
                            LogLevel::Debug,
                        ),
                        FetchOutcome::Recovered => (
                            format!(
                                "Pending tasks of '{}' are loading again (page {}, {} tasks)",
                                queue, page.page, count
                            ),
                            EventType::Success,
                            LogLevel::Info,
                        ),
                        FetchOutcome::Stale => (
                            format!("Discarded stale response for page {}", page.page),
                            EventType::Notice,
                            LogLevel::Debug,
                        ),
                    };
                    events.send_fetch_event(msg, event_type, log_level).await;
                }
                Err(e) => {
                    let log_level = classifier.classify_fetch_error(&e);
                    let message = e.to_string();
                    if store.fetch_failed(seq, message.clone()) {
                        events
                            .send_fetch_event(
                                format!("Failed to fetch pending tasks of '{}': {}", queue, message),
                                EventType::Error,
                                log_level,
                            )
                            .await;
                    }
                }
            }
        });
    }

    fn pending_tasks(&self) -> PendingTasksState {
        self.store.snapshot().pending_tasks
    }
}
