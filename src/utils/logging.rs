//! Logging macros gated on a module-level `ENABLE_LOGS` flag.
//!
//! The interceptor runs once per outgoing request, so its per-request lines
//! need an off switch that doesn't depend on `RUST_LOG`.
//!
//! Usage:
//! ```rust,ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_debug, log_error};
//!
//! log_debug!("serving {} from bundle", path);
//! ```

/// Conditional debug logging. Requires `const ENABLE_LOGS: bool` in the calling module.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}

/// Conditional info logging. Requires `const ENABLE_LOGS: bool` in the calling module.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Conditional warn logging. Requires `const ENABLE_LOGS: bool` in the calling module.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Conditional error logging. Requires `const ENABLE_LOGS: bool` in the calling module.
///
/// Failures on the interception path are swallowed after logging, so keep
/// this one on in production modules.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
