//! Main application state and UI loop
//!
//! Contains the App struct and main UI event handling logic

use crate::environment::Environment;
use crate::events::{Event as WorkerEvent, EventSender, EventType};
use crate::logging::LogLevel;
use crate::refresh::{PageParams, PollInterval, RefreshController};
use crate::store::{Store, select_poll_interval};
use crate::ui::dashboard::{DashboardState, render_dashboard};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use log::debug;
use ratatui::{Terminal, backend::Backend};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

/// UI configuration data grouped by concern
#[derive(Debug, Clone)]
pub struct UIConfig {
    pub with_background_color: bool,
    pub poll_interval: PollInterval,
    pub page_params: PageParams,
}

impl UIConfig {
    pub fn new(
        with_background_color: bool,
        poll_interval: PollInterval,
        page_params: PageParams,
    ) -> Self {
        Self {
            with_background_color,
            poll_interval,
            page_params,
        }
    }
}

/// What a key press asks the dashboard to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextPage,
    PrevPage,
    CyclePageSize,
    SelectNext,
    SelectPrev,
    ToggleRow,
    CancelTask,
}

impl Action {
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        // Raw mode delivers Ctrl+C as a key press
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::NextPage),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::PrevPage),
            KeyCode::Char('s') => Some(Action::CyclePageSize),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectNext),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectPrev),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::ToggleRow),
            KeyCode::Char('c') => Some(Action::CancelTask),
            _ => None,
        }
    }
}

/// Application state
pub struct App {
    /// Shared state written by the data provider.
    store: Store,

    /// Pagination and recurring fetch of the pending-task list.
    controller: RefreshController,

    /// Everything the dashboard renders.
    state: DashboardState,

    /// Receives activity events from background fetches.
    event_receiver: mpsc::Receiver<WorkerEvent>,

    /// Reports actions taken in the table.
    event_sender: EventSender,

    /// Broadcasts shutdown to the rest of the session.
    shutdown_sender: broadcast::Sender<()>,
}

impl App {
    /// Creates a new instance of the application.
    pub fn new(
        environment: Environment,
        store: Store,
        controller: RefreshController,
        event_receiver: mpsc::Receiver<WorkerEvent>,
        event_sender: EventSender,
        shutdown_sender: broadcast::Sender<()>,
        with_background_color: bool,
    ) -> Self {
        let ui_config = UIConfig::new(
            with_background_color,
            controller.poll_interval(),
            controller.params(),
        );
        let state = DashboardState::new(
            controller.queue().to_string(),
            environment,
            ui_config,
        );
        Self {
            store,
            controller,
            state,
            event_receiver,
            event_sender,
            shutdown_sender,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    #[cfg(test)]
    pub fn controller(&self) -> &RefreshController {
        &self.controller
    }

    /// Pull in queued events, settings from the store and the page the
    /// provider last loaded.
    pub fn sync(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.state.add_event(event);
        }

        let snapshot = self.store.snapshot();
        let poll_interval = select_poll_interval(&snapshot);
        if poll_interval != self.controller.poll_interval() {
            self.controller.set_poll_interval(poll_interval);
            self.state.set_poll_interval(poll_interval);
        }
        self.state.apply_pending(self.controller.pending_tasks());
        self.state.set_page_params(self.controller.params());
        self.state.update();
    }

    /// Applies one action. Returns `false` when the app should exit.
    pub fn handle_action(&mut self, action: Action) -> bool {
        let before = self.controller.params();
        match action {
            Action::Quit => {
                self.controller.unmount();
                let _ = self.shutdown_sender.send(());
                return false;
            }
            Action::NextPage => self.controller.next_page(self.state.total_item_count()),
            Action::PrevPage => self.controller.prev_page(),
            Action::CyclePageSize => self.controller.cycle_page_size(),
            Action::SelectNext => self.state.select_next(),
            Action::SelectPrev => self.state.select_prev(),
            Action::ToggleRow => {
                self.state.toggle_selected();
            }
            Action::CancelTask => {
                if let Some(id) = self.state.selected_task_id() {
                    debug!("cancel requested for task {}", id);
                    self.event_sender.try_send_event(WorkerEvent::table_with_level(
                        format!("Cancelling task {} is not supported", id),
                        EventType::Notice,
                        LogLevel::Debug,
                    ));
                }
            }
        }
        let after = self.controller.params();
        if after != before {
            self.event_sender.try_send_event(WorkerEvent::refresh_with_level(
                format!(
                    "Showing page {} of '{}' ({} rows per page)",
                    after.page_index + 1,
                    self.controller.queue(),
                    after.page_size
                ),
                EventType::Refresh,
                LogLevel::Info,
            ));
        }
        self.state.set_page_params(after);
        true
    }
}

/// Runs the dashboard until the user quits or the session shuts down.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    let mut shutdown_receiver = app.shutdown_sender.subscribe();
    app.controller.mount();

    loop {
        if shutdown_receiver.try_recv().is_ok() {
            app.controller.unmount();
            return Ok(());
        }

        app.sync();
        terminal.draw(|f| render_dashboard(f, &app.state))?;

        // Poll for key events
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Skip events that are not KeyEventKind::Press
                if key.kind == event::KeyEventKind::Release {
                    continue;
                }

                if let Some(action) = Action::from_key(key) {
                    if !app.handle_action(action) {
                        return Ok(());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ListPendingTasksResponse, PageOptions, PendingTask, QueueStats};
    use crate::refresh::PendingDataProvider;
    use crate::store::PendingTasksState;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Records page requests and answers them straight from a fixed page.
    struct FixedProvider {
        store: Store,
        requests: Mutex<Vec<PageOptions>>,
    }

    impl PendingDataProvider for FixedProvider {
        fn request_page(&self, _queue: &str, page: PageOptions) {
            self.requests.lock().unwrap().push(page);
            let seq = self.store.fetch_started();
            let tasks = (0..page.size.min(3))
                .map(|i| PendingTask {
                    id: format!("task-{}-{}", page.page, i),
                    task_type: "email:welcome".to_string(),
                    payload: json!({ "n": i }),
                    queue: "default".to_string(),
                    retried: 0,
                    max_retry: 25,
                    last_failed_at: None,
                    error_message: None,
                })
                .collect();
            self.store.fetch_succeeded(
                seq,
                ListPendingTasksResponse {
                    tasks,
                    stats: QueueStats {
                        pending: 45,
                        ..QueueStats::default()
                    },
                },
            );
        }

        fn pending_tasks(&self) -> PendingTasksState {
            self.store.snapshot().pending_tasks
        }
    }

    fn app() -> (App, Arc<FixedProvider>, mpsc::Receiver<WorkerEvent>) {
        let store = Store::new(PollInterval::from_secs(5).unwrap());
        let provider = Arc::new(FixedProvider {
            store: store.clone(),
            requests: Mutex::new(Vec::new()),
        });
        let mut controller = RefreshController::new(
            "default",
            PollInterval::from_secs(5).unwrap(),
            provider.clone(),
        );
        controller.mount();

        let (_unused_tx, event_receiver) = mpsc::channel(10);
        let (table_tx, table_rx) = mpsc::channel(10);
        let (shutdown_sender, _) = broadcast::channel(1);
        let mut app = App::new(
            Environment::Local,
            store,
            controller,
            event_receiver,
            EventSender::new(table_tx),
            shutdown_sender,
            false,
        );
        app.sync();
        (app, provider, table_rx)
    }

    #[test]
    fn keys_map_to_actions() {
        let key = |code| Action::from_key(KeyEvent::from(code));
        assert_eq!(key(KeyCode::Right), Some(Action::NextPage));
        assert_eq!(key(KeyCode::Left), Some(Action::PrevPage));
        assert_eq!(key(KeyCode::Char('s')), Some(Action::CyclePageSize));
        assert_eq!(key(KeyCode::Enter), Some(Action::ToggleRow));
        assert_eq!(key(KeyCode::Char('c')), Some(Action::CancelTask));
        assert_eq!(key(KeyCode::Esc), Some(Action::Quit));
        assert_eq!(key(KeyCode::Char('x')), None);
        assert_eq!(
            Action::from_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn paging_keys_drive_the_controller() {
        let (mut app, provider, _rx) = app();
        assert_eq!(app.state().total_item_count(), 45);

        assert!(app.handle_action(Action::NextPage));
        assert_eq!(app.controller().params().page_index, 1);
        assert_eq!(app.state().page_params.page_index, 1);

        app.handle_action(Action::CyclePageSize);
        assert_eq!(app.controller().params().page_index, 0);
        assert_eq!(app.controller().params().page_size.get(), 30);

        let requests = provider.requests.lock().unwrap().clone();
        assert_eq!(
            requests,
            vec![
                PageOptions { page: 1, size: 20 },
                PageOptions { page: 2, size: 20 },
                PageOptions { page: 1, size: 30 },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_expands_selected_row_only() {
        let (mut app, _provider, _rx) = app();
        app.handle_action(Action::SelectNext);
        app.handle_action(Action::ToggleRow);
        assert!(app.state().rows.is_expanded("task-1-1"));
        assert!(!app.state().rows.is_expanded("task-1-0"));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_is_inert() {
        let (mut app, provider, mut rx) = app();
        let before = app.state().pending.data.clone();

        assert!(app.handle_action(Action::CancelTask));
        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type, EventType::Notice);
        assert!(event.msg.contains("task-1-0"));

        app.sync();
        assert_eq!(app.state().pending.data, before);
        assert_eq!(provider.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn quit_unmounts_the_controller() {
        let (mut app, provider, _rx) = app();
        assert!(!app.handle_action(Action::Quit));
        assert!(!app.controller().is_mounted());

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(provider.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn store_poll_interval_reaches_the_controller() {
        let (mut app, provider, _rx) = app();
        app.store.set_poll_interval(PollInterval::from_secs(10).unwrap());
        app.sync();
        assert_eq!(app.controller().poll_interval().as_secs(), 10);
        assert_eq!(app.state().poll_interval.as_secs(), 10);
        // The restart issues one immediate fetch.
        assert_eq!(provider.requests.lock().unwrap().len(), 2);
    }
}
