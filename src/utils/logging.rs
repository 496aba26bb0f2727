//! Gated logging macros for the grading engine.
//!
//! `process_frame` runs once per analyzed video frame, so per-frame logs are
//! noisy. Each module opts in with its own flag:
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_debug, log_info, log_warn};
//!
//! log_info!("rep {} counted", count);
//! ```
//! All records go to the `repgrade` target so hosts can filter with
//! `RUST_LOG=repgrade=debug`.

/// Debug-level record, emitted only when the calling module sets `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!(target: "repgrade", $($arg)*);
        }
    };
}

/// Info-level record, emitted only when the calling module sets `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!(target: "repgrade", $($arg)*);
        }
    };
}

/// Warn-level record, emitted only when the calling module sets `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!(target: "repgrade", $($arg)*);
        }
    };
}
