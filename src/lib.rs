//! # Fanlog
//!
//! An embeddable logging core: structured log events from call sites,
//! severity filtering, and non-blocking fan-out to an ordered set of
//! sinks.
//!
//! ## Features
//!
//! - **Non-blocking**: `log()` only pays for the level check and entry
//!   construction; delivery happens on one worker lane per sink
//! - **Built-in sinks**: console echo, size-bounded rotating file, and a
//!   capacity-bounded in-memory ring for inspection and export
//! - **Extensible**: any type implementing [`Sink`] joins the fan-out
//! - **Never fails the caller**: sink errors degrade to that sink
//!   dropping the entry
//!
//! ## Quick start
//!
//! ```no_run
//! use fanlog::{error, info, Logger, LogLevel};
//!
//! let logger = Logger::builder()
//!     .min_level(LogLevel::Debug)
//!     .logs_dir("logs")
//!     .build();
//!
//! info!(logger, "ready on port {}", 8080);
//! error!(logger, "connection lost");
//!
//! logger.flush();
//! println!("{}", logger.export_logs());
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        CallSite, DispatchMetrics, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerConfig,
        Result, SeverityClass, Sink, SinkError, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::sinks::{
        ConsoleSink, MemoryRingSink, RotatingFileSink, DEFAULT_MAX_FILE_SIZE,
        DEFAULT_RING_CAPACITY,
    };
}

pub use crate::core::{
    CallSite, DispatchMetrics, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerConfig, Result,
    SeverityClass, Sink, SinkError, DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use crate::sinks::{
    ConsoleSink, MemoryRingSink, RotatingFileSink, DEFAULT_MAX_FILE_SIZE, DEFAULT_RING_CAPACITY,
};
