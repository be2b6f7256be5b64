//! Logging utilities for the arena
//!
//! Provides lightweight logging for reservation lifecycle events. Uses
//! `tracing` for structured logging with minimal overhead. The bump
//! fast path never logs; only the OS-facing transitions do.

// Re-export tracing macros for use throughout the crate
pub use tracing::{debug, error, info, trace, warn, Level};

/// Initialize logging with sensible defaults
///
/// Call this once early in the host program, before the first arena is
/// built. For production builds, logs at INFO level and above are
/// enabled. For debug builds, DEBUG and TRACE levels are also enabled.
pub fn init() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            #[cfg(debug_assertions)]
            {
                EnvFilter::new("vmarena=debug")
            }
            #[cfg(not(debug_assertions))]
            {
                EnvFilter::new("vmarena=info")
            }
        });

    fmt()
        .with_env_filter(filter)
        .compact()
        .try_init()
        .ok(); // Ignore error if already initialized
}

/// Log a fresh address-space reservation
#[inline]
pub(crate) fn log_reserve(total: usize, base: *const u8) {
    debug!(
        target: "arena",
        total,
        base = ?base,
        "reserved address space"
    );
}

/// Log committed-range growth
#[inline]
pub(crate) fn log_commit(committed: usize, growth: usize) {
    trace!(
        target: "arena",
        committed,
        growth,
        "committed backing"
    );
}

/// Log a cursor rewind
#[inline]
pub(crate) fn log_reset(used: usize) {
    trace!(
        target: "arena",
        used,
        "arena reset"
    );
}

/// Log the final release of a reservation
#[inline]
pub(crate) fn log_release(total: usize) {
    debug!(
        target: "arena",
        total,
        "released reservation"
    );
}
