//! Headless mode execution

use super::{
    SessionData,
    messages::{print_session_exit_success, print_session_shutdown, print_session_starting},
};
use crate::refresh::PageParams;
use crate::store::{AppState, select_pending_tasks, select_queue_stats};
use std::error::Error;

/// One-line description of the page currently in the store.
pub fn page_summary(queue: &str, params: PageParams, state: &AppState) -> String {
    let pending = select_pending_tasks(state);
    let total = select_queue_stats(state).map_or(0, |s| s.pending);
    if pending.data.is_empty() {
        return format!("{}: No pending tasks at this time.", queue);
    }
    let ids: Vec<&str> = pending.data.iter().map(|t| t.id.as_str()).collect();
    format!(
        "{}: page {}/{} ({} of {} pending) [{}]",
        queue,
        params.page_index + 1,
        params.page_count(total),
        pending.data.len(),
        total,
        ids.join(", ")
    )
}

/// Runs the application in headless mode
///
/// Mounts the refresh controller, then prints activity events and a page
/// summary after every successful refresh until Ctrl+C.
pub async fn run_headless_mode(mut session: SessionData) -> Result<(), Box<dyn Error>> {
    print_session_starting(
        "headless",
        session.controller.queue(),
        &session.environment,
    );

    // Trigger shutdown on Ctrl+C
    let shutdown_sender_clone = session.shutdown_sender.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_sender_clone.send(());
        }
    });

    let mut shutdown_receiver = session.shutdown_sender.subscribe();
    let mut store_receiver = session.store.subscribe();
    let mut last_printed = 0;

    session.controller.mount();

    // Event loop: log events and page changes to console until shutdown
    loop {
        tokio::select! {
            Some(event) = session.event_receiver.recv() => {
                if event.should_display() {
                    println!("{}", event);
                }
            }
            Ok(()) = store_receiver.changed() => {
                let summary = {
                    let state = store_receiver.borrow_and_update();
                    let pending = select_pending_tasks(&state);
                    if pending.loading || pending.latest_applied == last_printed {
                        None
                    } else {
                        last_printed = pending.latest_applied;
                        Some(page_summary(
                            session.controller.queue(),
                            session.controller.params(),
                            &state,
                        ))
                    }
                };
                if let Some(summary) = summary {
                    println!("{}", summary);
                }
            }
            _ = shutdown_receiver.recv() => {
                break;
            }
        }
    }

    print_session_shutdown();
    session.controller.unmount();
    print_session_exit_success();

    Ok(())
}
