//! Logging macros with automatic call-site capture.
//!
//! These macros are the convenience layer over [`Logger::log`]: they
//! format arguments like `println!` and capture the call site so the
//! dispatcher never has to inspect call stacks itself.
//!
//! # Examples
//!
//! ```no_run
//! use fanlog::{info, warning, Logger};
//!
//! let logger = Logger::builder().logs_dir("logs").build();
//!
//! info!(logger, "server started");
//!
//! let attempts = 3;
//! warning!(logger, "retry attempt {} failed", attempts);
//! ```
//!
//! [`Logger::log`]: crate::Logger::log

/// Capture the current call site (`file!()`, `module_path!()`,
/// `line!()`) as a [`CallSite`](crate::CallSite).
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite {
            file: file!(),
            function: module_path!(),
            line: line!(),
        }
    };
}

/// Log a message at an explicit level with automatic formatting.
///
/// ```no_run
/// # use fanlog::{log, Logger, LogLevel};
/// # let logger = Logger::builder().logs_dir("logs").build();
/// log!(logger, LogLevel::Info, "cache warmed in {}ms", 12);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+), $crate::call_site!())
    };
}

/// Log a verbose-level message.
#[macro_export]
macro_rules! verbose {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Verbose, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, $($arg)+)
    };
}
