//! Cancellable repeating timer backed by a tokio task.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

/// Runs `tick` every `period`, starting one period after creation, until
/// cancelled or dropped.
#[derive(Debug)]
pub struct RefreshTimer {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl RefreshTimer {
    pub fn spawn<F>(period: Duration, tick: F) -> Self
    where
        F: Fn() + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            // A slow runtime must not produce a burst of catch-up fetches.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => tick(),
                }
            }
        });

        Self { token, handle }
    }

    /// Stop the timer. No tick runs after this returns.
    pub fn cancel(&self) {
        self.token.cancel();
        self.handle.abort();
    }

    #[cfg(test)]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
