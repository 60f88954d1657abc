//! Logging macros
//!
//! Linux kernel-style logging macros (`pr_*`) layered on the `log` facade.
//! Every record is emitted with the `userfs` target so a host logger can
//! route filesystem messages separately.
//!
//! # Usage
//!
//! ```rust
//! use userfs::{pr_debug, pr_info};
//!
//! pr_info!("registered filesystem {}", "userfs");
//! pr_debug!("lookup {}: miss", 1000);
//! ```
//!
//! # Macro List
//!
//! - `pr_err!` - Error level (error conditions)
//! - `pr_warn!` - Warning level (warning conditions)
//! - `pr_notice!` - Notice level (normal but significant)
//! - `pr_info!` - Info level (informational messages)
//! - `pr_debug!` - Debug level (debug messages)
//!
//! The facade checks `log::max_level()` before formatting, so disabled
//! levels never evaluate their arguments.

/// Internal implementation macro with level filtering
#[doc(hidden)]
#[macro_export]
macro_rules! __pr_impl {
    ($level:expr, $($arg:tt)+) => {
        $crate::log::facade::log!(
            target: $crate::log::LOG_TARGET,
            $crate::log::LogLevel::to_log_level($level),
            $($arg)+
        )
    };
}

/// Log an error message
#[macro_export]
macro_rules! pr_err {
    ($($arg:tt)+) => {
        $crate::__pr_impl!($crate::log::LogLevel::Error, $($arg)+)
    };
}

/// Log a warning message
#[macro_export]
macro_rules! pr_warn {
    ($($arg:tt)+) => {
        $crate::__pr_impl!($crate::log::LogLevel::Warning, $($arg)+)
    };
}

/// Log a notice message
#[macro_export]
macro_rules! pr_notice {
    ($($arg:tt)+) => {
        $crate::__pr_impl!($crate::log::LogLevel::Notice, $($arg)+)
    };
}

/// Log an informational message
#[macro_export]
macro_rules! pr_info {
    ($($arg:tt)+) => {
        $crate::__pr_impl!($crate::log::LogLevel::Info, $($arg)+)
    };
}

/// Log a debug message
#[macro_export]
macro_rules! pr_debug {
    ($($arg:tt)+) => {
        $crate::__pr_impl!($crate::log::LogLevel::Debug, $($arg)+)
    };
}
