pub mod cli_consts {
    //! Monitor Configuration Constants
    //!
    //! This module contains the configuration constants for the monitor,
    //! organized by functional area.

    // =============================================================================
    // PAGINATION
    // =============================================================================

    /// Page sizes the pending table offers, in display order.
    pub const PAGE_SIZE_OPTIONS: [usize; 5] = [10, 20, 30, 60, 100];

    /// Page size used when a view is mounted.
    pub const DEFAULT_PAGE_SIZE: usize = 20;

    // =============================================================================
    // POLLING
    // =============================================================================

    /// Poll interval used when neither the config file nor the CLI sets one.
    pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 8;

    // =============================================================================
    // ACTIVITY LOG
    // =============================================================================

    /// The maximum number of events to keep in the activity log.
    pub const MAX_ACTIVITY_LOGS: usize = 100;

    /// Buffer size of the event channel between the data layer and the UI.
    pub const EVENT_QUEUE_SIZE: usize = 100;

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    /// HTTP client timeouts
    pub mod http {
        use std::time::Duration;

        /// TCP connect timeout (seconds)
        pub const CONNECT_TIMEOUT_SECS: u64 = 5;

        /// Whole-request timeout (seconds)
        pub const REQUEST_TIMEOUT_SECS: u64 = 10;

        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }

        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }
    }
}
