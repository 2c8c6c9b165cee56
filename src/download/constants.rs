//! Constants for the download module (timeouts, pool sizing).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Minimum allowed worker count.
pub(crate) const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed worker count.
pub(crate) const MAX_CONCURRENCY: usize = 100;

/// Default worker count.
pub const DEFAULT_CONCURRENCY: usize = 15;
