//! Console logger for hosted builds
//!
//! Prints every enabled record to stderr in the kernel console format:
//! `<color>[LEVEL] message<reset>`.

use std::io::Write;

use super::LogLevel;
use crate::vfs::FsError;

static LOGGER: ConsoleLogger = ConsoleLogger;

struct ConsoleLogger;

impl ::log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &::log::Metadata) -> bool {
        metadata.level() <= ::log::max_level()
    }

    fn log(&self, record: &::log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = LogLevel::from_log_level(record.level());
        // stderr 自带锁，整行一次写出避免交错
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "{}{} {}{}",
            level.color_code(),
            level.as_str(),
            record.args(),
            level.reset_color_code()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Initialize the console logger (call once at startup)
pub fn init(level: LogLevel) -> Result<(), FsError> {
    ::log::set_logger(&LOGGER).map_err(|_| FsError::AlreadyExists)?;
    ::log::set_max_level(level.to_level_filter());
    Ok(())
}
