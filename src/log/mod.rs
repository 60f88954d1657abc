//! Logging
//!
//! Kernel-style `pr_*!` macros over the [`log`](::log) facade. The library
//! never installs a logger on its own; a `std` host can use
//! [`logger::init`] to get colored console output.

pub mod level;
#[cfg(feature = "std")]
pub mod logger;
pub mod macros;

pub use level::LogLevel;

/// Re-export of the `log` facade used by the `pr_*!` macros
pub use ::log as facade;

/// Target attached to every record emitted by this crate
pub const LOG_TARGET: &str = "userfs";
