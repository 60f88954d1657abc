//! Kernel-style log levels

/// Kernel log level, most severe first
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// KERN_EMERG
    Emergency = 0,
    /// KERN_ALERT
    Alert = 1,
    /// KERN_CRIT
    Critical = 2,
    /// KERN_ERR
    Error = 3,
    /// KERN_WARNING
    Warning = 4,
    /// KERN_NOTICE
    Notice = 5,
    /// KERN_INFO
    Info = 6,
    /// KERN_DEBUG
    Debug = 7,
}

impl LogLevel {
    /// Bracketed tag printed before each message
    pub const fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Emergency => "[EMERG]",
            LogLevel::Alert => "[ALERT]",
            LogLevel::Critical => "[CRIT]",
            LogLevel::Error => "[ERR]",
            LogLevel::Warning => "[WARNING]",
            LogLevel::Notice => "[NOTICE]",
            LogLevel::Info => "[INFO]",
            LogLevel::Debug => "[DEBUG]",
        }
    }

    /// ANSI color for messages of this level
    pub const fn color_code(&self) -> &'static str {
        match self {
            Self::Emergency | Self::Alert | Self::Critical => "\x1b[1;31m",
            Self::Error => "\x1b[31m",
            Self::Warning => "\x1b[33m",
            Self::Notice => "\x1b[1;37m",
            Self::Info => "\x1b[37m",
            Self::Debug => "\x1b[90m",
        }
    }

    /// ANSI sequence that ends [`Self::color_code`]
    pub const fn reset_color_code(&self) -> &'static str {
        "\x1b[0m"
    }

    /// Maps the kernel ladder onto the `log` facade.
    ///
    /// The facade has no levels above `Error`, so Emergency..Error collapse onto it,
    /// and Notice is reported as `Info`.
    pub const fn to_log_level(self) -> ::log::Level {
        match self {
            Self::Emergency | Self::Alert | Self::Critical | Self::Error => ::log::Level::Error,
            Self::Warning => ::log::Level::Warn,
            Self::Notice | Self::Info => ::log::Level::Info,
            Self::Debug => ::log::Level::Debug,
        }
    }

    /// Inverse of [`Self::to_log_level`]; `Trace` folds into `Debug`
    pub const fn from_log_level(level: ::log::Level) -> Self {
        match level {
            ::log::Level::Error => Self::Error,
            ::log::Level::Warn => Self::Warning,
            ::log::Level::Info => Self::Info,
            ::log::Level::Debug | ::log::Level::Trace => Self::Debug,
        }
    }

    /// Facade filter that lets this level and everything more severe through
    pub fn to_level_filter(self) -> ::log::LevelFilter {
        self.to_log_level().to_level_filter()
    }
}

impl core::str::FromStr for LogLevel {
    type Err = crate::vfs::FsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "emerg" | "emergency" => Ok(Self::Emergency),
            "alert" => Ok(Self::Alert),
            "crit" | "critical" => Ok(Self::Critical),
            "err" | "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warning),
            "notice" => Ok(Self::Notice),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            _ => Err(crate::vfs::FsError::InvalidArgument),
        }
    }
}
