//! Event System
//!
//! Types and implementations for activity events and logging

use crate::logging::{LogLevel, should_log_with_env};
use chrono::Local;
use std::fmt::Display;
use tokio::sync::mpsc;

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum Source {
    /// Pagination state and the recurring fetch timer.
    Refresh,
    /// Requests to the monitoring API and their outcome.
    Fetcher,
    /// Actions taken from the table itself.
    Table,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Success,
    Error,
    Refresh,
    Notice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub source: Source,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
}

impl Event {
    fn new(source: Source, msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            source,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
        }
    }

    pub fn refresh_with_level(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Source::Refresh, msg, event_type, log_level)
    }

    pub fn fetcher_with_level(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Source::Fetcher, msg, event_type, log_level)
    }

    pub fn table_with_level(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Source::Table, msg, event_type, log_level)
    }

    pub fn should_display(&self) -> bool {
        // Always show success events and info level events
        if self.event_type == EventType::Success || self.log_level >= LogLevel::Info {
            return true;
        }
        should_log_with_env(self.log_level)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.event_type, self.timestamp, self.source, self.msg
        )
    }
}

/// Cloneable handle used by background tasks to report activity to the UI.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Send a generic event
    pub async fn send_event(&self, event: Event) {
        let _ = self.sender.send(event).await;
    }

    /// Send without waiting; the event is dropped if the UI is lagging.
    pub fn try_send_event(&self, event: Event) {
        let _ = self.sender.try_send(event);
    }

    pub async fn send_fetch_event(&self, message: String, event_type: EventType, log_level: LogLevel) {
        self.send_event(Event::fetcher_with_level(message, event_type, log_level))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sender_delivers_fetch_events() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);
        sender
            .send_fetch_event("page 1 loaded".into(), EventType::Success, LogLevel::Info)
            .await;
        let event = rx.recv().await.unwrap();
        assert_eq!(event.source, Source::Fetcher);
        assert_eq!(event.msg, "page 1 loaded");
    }

    #[test]
    fn info_and_success_events_are_always_displayed() {
        let info = Event::refresh_with_level("tick".into(), EventType::Refresh, LogLevel::Info);
        let ok = Event::fetcher_with_level("ok".into(), EventType::Success, LogLevel::Debug);
        assert!(info.should_display());
        assert!(ok.should_display());
    }

    #[test]
    fn display_includes_source_and_message() {
        let event =
            Event::table_with_level("cancel ignored".into(), EventType::Notice, LogLevel::Warn);
        let rendered = event.to_string();
        assert!(rendered.starts_with("Notice ["));
        assert!(rendered.ends_with("Table: cancel ignored"));
    }
}
