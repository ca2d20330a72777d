//! Refresh controller
//!
//! Owns the pagination state of a pending-task view and the recurring fetch
//! that keeps it current. Any change to the queue, the poll interval, the page
//! parameters or the data provider cancels the running timer, issues one
//! fetch right away and starts a new timer for the new parameters.

mod params;
mod provider;
mod timer;

pub use params::{PageParams, PageSize, ParamError, PollInterval};
pub use provider::{PendingDataProvider, StoreProvider};

use crate::store::PendingTasksState;
use log::debug;
use std::sync::Arc;
use timer::RefreshTimer;

pub struct RefreshController {
    queue: String,
    poll_interval: PollInterval,
    params: PageParams,
    provider: Arc<dyn PendingDataProvider>,
    timer: Option<RefreshTimer>,
    mounted: bool,
}

impl RefreshController {
    /// Creates an unmounted controller on page 0 with the default page size.
    pub fn new(
        queue: impl Into<String>,
        poll_interval: PollInterval,
        provider: Arc<dyn PendingDataProvider>,
    ) -> Self {
        Self {
            queue: queue.into(),
            poll_interval,
            params: PageParams::default(),
            provider,
            timer: None,
            mounted: false,
        }
    }

    /// Overrides the initial page size. Only meaningful before `mount`.
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.params = PageParams::new(0, page_size);
        self
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    pub fn poll_interval(&self) -> PollInterval {
        self.poll_interval
    }

    pub fn params(&self) -> PageParams {
        self.params
    }

    /// Loading flag and items as the provider currently knows them.
    pub fn pending_tasks(&self) -> PendingTasksState {
        self.provider.pending_tasks()
    }

    #[cfg(test)]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    #[cfg(test)]
    pub fn has_active_timer(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    #[cfg(test)]
    pub fn provider(&self) -> &Arc<dyn PendingDataProvider> {
        &self.provider
    }

    /// Starts fetching. Mounting an already mounted controller restarts it.
    pub fn mount(&mut self) {
        self.mounted = true;
        self.restart();
    }

    /// Stops the recurring fetch. Nothing is fetched until the next `mount`.
    pub fn unmount(&mut self) {
        self.mounted = false;
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        debug!("refresh of '{}' stopped", self.queue);
    }

    pub fn set_page(&mut self, page_index: usize) {
        self.apply_params(PageParams::new(page_index, self.params.page_size));
    }

    /// Changing the page size always goes back to the first page.
    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.apply_params(PageParams::new(0, page_size));
    }

    pub fn cycle_page_size(&mut self) {
        self.set_page_size(self.params.page_size.next());
    }

    /// Moves forward one page if `total` items leave room for it.
    pub fn next_page(&mut self, total: u64) {
        if self.params.page_index + 1 < self.params.page_count(total) {
            self.set_page(self.params.page_index + 1);
        }
    }

    pub fn prev_page(&mut self) {
        if self.params.page_index > 0 {
            self.set_page(self.params.page_index - 1);
        }
    }

    pub fn set_queue(&mut self, queue: impl Into<String>) {
        let queue = queue.into();
        if queue != self.queue {
            self.queue = queue;
            self.restart();
        }
    }

    pub fn set_poll_interval(&mut self, poll_interval: PollInterval) {
        if poll_interval != self.poll_interval {
            self.poll_interval = poll_interval;
            self.restart();
        }
    }

    pub fn set_provider(&mut self, provider: Arc<dyn PendingDataProvider>) {
        let same = std::ptr::eq(
            Arc::as_ptr(&provider) as *const (),
            Arc::as_ptr(&self.provider) as *const (),
        );
        if !same {
            self.provider = provider;
            self.restart();
        }
    }

    fn apply_params(&mut self, params: PageParams) {
        if params != self.params {
            self.params = params;
            self.restart();
        }
    }

    fn restart(&mut self) {
        if !self.mounted {
            return;
        }
        // The old timer must be gone before the new one exists.
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }

        let page = self.params.to_page_options();
        self.provider.request_page(&self.queue, page);

        let provider = Arc::clone(&self.provider);
        let queue = self.queue.clone();
        self.timer = Some(RefreshTimer::spawn(
            self.poll_interval.as_duration(),
            move || provider.request_page(&queue, page),
        ));

        debug!(
            "refresh of '{}' scheduled every {} (page {}, size {})",
            self.queue, self.poll_interval, page.page, page.size
        );
    }
}

impl Drop for RefreshController {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PageOptions;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::sleep;

    /// Records every page request instead of fetching.
    #[derive(Default)]
    struct RecordingProvider {
        requests: Mutex<Vec<(String, PageOptions)>>,
    }

    impl RecordingProvider {
        fn requests(&self) -> Vec<(String, PageOptions)> {
            self.requests.lock().unwrap().clone()
        }

        fn pages(&self) -> Vec<(usize, usize)> {
            self.requests()
                .into_iter()
                .map(|(_, p)| (p.page, p.size))
                .collect()
        }

        fn count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    impl PendingDataProvider for RecordingProvider {
        fn request_page(&self, queue: &str, page: PageOptions) {
            self.requests
                .lock()
                .unwrap()
                .push((queue.to_string(), page));
        }

        fn pending_tasks(&self) -> PendingTasksState {
            PendingTasksState {
                loading: self.count() > 0,
                ..PendingTasksState::default()
            }
        }
    }

    fn secs(s: u64) -> PollInterval {
        PollInterval::from_secs(s).unwrap()
    }

    fn size(s: usize) -> PageSize {
        PageSize::new(s).unwrap()
    }

    fn controller(poll: u64) -> (RefreshController, Arc<RecordingProvider>) {
        let provider = Arc::new(RecordingProvider::default());
        let controller = RefreshController::new("default", secs(poll), provider.clone());
        (controller, provider)
    }

    #[tokio::test(start_paused = true)]
    async fn mount_fetches_first_page_immediately() {
        let (mut controller, provider) = controller(5);
        assert_eq!(provider.count(), 0);

        controller.mount();
        assert_eq!(
            provider.requests(),
            vec![("default".to_string(), PageOptions { page: 1, size: 20 })]
        );
        assert!(controller.has_active_timer());
    }

    #[tokio::test(start_paused = true)]
    async fn page_size_change_resets_page_index() {
        let (mut controller, _provider) = controller(5);
        controller.mount();

        for (start_page, new_size) in [(3, 10), (0, 30), (9, 100), (1, 20), (4, 60)] {
            controller.set_page(start_page);
            controller.set_page_size(size(new_size));
            assert_eq!(controller.params().page_index, 0);
            assert_eq!(controller.params().page_size.get(), new_size);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn set_page_keeps_page_size() {
        let (mut controller, provider) = controller(5);
        controller.mount();
        controller.set_page_size(size(60));
        controller.set_page(4);

        assert_eq!(controller.params(), PageParams::new(4, size(60)));
        assert_eq!(provider.pages().last(), Some(&(5, 60)));
    }

    #[tokio::test(start_paused = true)]
    async fn requests_use_one_based_pages() {
        let (mut controller, provider) = controller(5);
        controller.mount();
        for index in [1usize, 2, 5, 17] {
            controller.set_page(index);
            assert_eq!(provider.pages().last(), Some(&(index + 1, 20)));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_range_page_index_is_clamped() {
        let (mut controller, provider) = controller(5);
        controller.mount();
        controller.set_page(usize::MAX);

        assert_eq!(controller.params().page_index, usize::MAX - 1);
        assert_eq!(provider.pages().last(), Some(&(usize::MAX, 20)));

        // Paging forward past the total stays put.
        controller.next_page(45);
        assert_eq!(controller.params().page_index, usize::MAX - 1);
    }

    #[tokio::test(start_paused = true)]
    async fn pending_tasks_are_read_from_the_provider() {
        let (mut controller, _provider) = controller(5);
        assert!(!controller.pending_tasks().loading);
        controller.mount();
        assert!(controller.pending_tasks().loading);
    }

    #[tokio::test(start_paused = true)]
    async fn example_scenario() {
        let (mut controller, provider) = controller(5);

        controller.mount();
        assert_eq!(provider.pages(), vec![(1, 20)]);

        controller.set_page_size(size(10));
        assert_eq!(controller.params().page_index, 0);
        assert_eq!(provider.pages(), vec![(1, 20), (1, 10)]);

        sleep(Duration::from_millis(5_100)).await;
        assert_eq!(provider.pages(), vec![(1, 20), (1, 10), (1, 10)]);
    }

    #[tokio::test(start_paused = true)]
    async fn only_one_timer_survives_many_changes() {
        let (mut controller, provider) = controller(5);
        controller.mount();
        controller.set_page(1);
        controller.set_page(2);
        controller.set_page_size(size(30));
        controller.set_poll_interval(secs(4));
        controller.set_queue("critical");
        controller.set_poll_interval(secs(5));
        let immediate = provider.count();
        assert_eq!(immediate, 7);

        sleep(Duration::from_millis(5_100)).await;
        assert_eq!(provider.count(), immediate + 1);

        sleep(Duration::from_secs(5)).await;
        assert_eq!(provider.count(), immediate + 2);

        let (queue, page) = provider.requests().last().cloned().unwrap();
        assert_eq!(queue, "critical");
        assert_eq!(page, PageOptions { page: 1, size: 30 });
    }

    #[tokio::test(start_paused = true)]
    async fn timer_uses_parameters_captured_at_scheduling() {
        let (mut controller, provider) = controller(5);
        controller.mount();
        controller.set_page(2);

        sleep(Duration::from_millis(5_100)).await;
        assert_eq!(provider.pages(), vec![(1, 20), (3, 20), (3, 20)]);
    }

    #[tokio::test(start_paused = true)]
    async fn unchanged_inputs_do_not_restart() {
        let (mut controller, provider) = controller(5);
        controller.mount();
        controller.set_page(0);
        controller.set_page_size(size(20));
        controller.set_poll_interval(secs(5));
        controller.set_queue("default");
        let same = controller.provider().clone();
        controller.set_provider(same);
        assert_eq!(provider.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn switching_provider_restarts_on_the_new_one() {
        let (mut controller, first) = controller(5);
        controller.mount();

        let second = Arc::new(RecordingProvider::default());
        controller.set_provider(second.clone());
        assert_eq!(second.pages(), vec![(1, 20)]);

        sleep(Duration::from_millis(5_100)).await;
        assert_eq!(first.count(), 1);
        assert_eq!(second.count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn no_fetch_after_unmount() {
        let (mut controller, provider) = controller(5);
        controller.mount();
        sleep(Duration::from_millis(5_100)).await;
        assert_eq!(provider.count(), 2);

        controller.unmount();
        assert!(!controller.has_active_timer());
        sleep(Duration::from_secs(60)).await;
        assert_eq!(provider.count(), 2);

        // Pagination changes while unmounted are remembered but not fetched.
        controller.set_page(3);
        assert_eq!(provider.count(), 2);
        controller.mount();
        assert_eq!(provider.pages().last(), Some(&(4, 20)));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_controller_stops_refresh() {
        let (mut controller, provider) = controller(1);
        controller.mount();
        drop(controller);
        sleep(Duration::from_secs(10)).await;
        assert_eq!(provider.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn keyboard_paging_is_bounded_by_total() {
        let (mut controller, provider) = controller(5);
        controller.mount();

        controller.prev_page();
        assert_eq!(controller.params().page_index, 0);

        controller.next_page(45);
        controller.next_page(45);
        controller.next_page(45);
        assert_eq!(controller.params().page_index, 2);
        assert_eq!(provider.pages().last(), Some(&(3, 20)));

        controller.prev_page();
        assert_eq!(controller.params().page_index, 1);

        controller.cycle_page_size();
        assert_eq!(controller.params(), PageParams::new(0, size(30)));
    }
}
