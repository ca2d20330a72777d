//! Session setup and initialization

use crate::api::{ApiClient, TaskQueueApi};
use crate::consts::cli_consts::EVENT_QUEUE_SIZE;
use crate::environment::Environment;
use crate::events::{Event, EventSender};
use crate::refresh::{PageSize, PendingDataProvider, PollInterval, RefreshController, StoreProvider};
use crate::store::Store;
use log::debug;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

/// What to watch and how, after config file and CLI flags are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub queue: String,
    pub environment: Environment,
    pub poll_interval: PollInterval,
    pub page_size: PageSize,
}

/// Session data for both TUI and headless modes
pub struct SessionData {
    /// Activity events from background fetches
    pub event_receiver: mpsc::Receiver<Event>,
    /// Sender side of the same channel, for UI actions
    pub event_sender: EventSender,
    /// Shutdown signal shared by the session
    pub shutdown_sender: broadcast::Sender<()>,
    /// Shared state the provider writes into
    pub store: Store,
    /// Unmounted controller for the watched queue
    pub controller: RefreshController,
    /// Environment the API client talks to
    pub environment: Environment,
}

/// Builds the data layer and an unmounted refresh controller.
pub fn setup_session(options: SessionOptions) -> Result<SessionData, Box<dyn Error>> {
    let api: Arc<dyn TaskQueueApi> = Arc::new(ApiClient::new(options.environment.clone())?);
    Ok(setup_session_with_api(options, api))
}

/// Same as [`setup_session`] with a caller-provided API implementation.
pub fn setup_session_with_api(options: SessionOptions, api: Arc<dyn TaskQueueApi>) -> SessionData {
    let store = Store::new(options.poll_interval);
    let (event_tx, event_receiver) = mpsc::channel(EVENT_QUEUE_SIZE);
    let event_sender = EventSender::new(event_tx);

    let provider: Arc<dyn PendingDataProvider> = Arc::new(StoreProvider::new(
        api,
        store.clone(),
        event_sender.clone(),
    ));
    let controller = RefreshController::new(options.queue.clone(), options.poll_interval, provider)
        .with_page_size(options.page_size);

    let (shutdown_sender, _) = broadcast::channel(1);

    debug!(
        "session for '{}' on {} (every {}, {} rows per page)",
        options.queue, options.environment, options.poll_interval, options.page_size
    );

    SessionData {
        event_receiver,
        event_sender,
        shutdown_sender,
        store,
        controller,
        environment: options.environment,
    }
}
