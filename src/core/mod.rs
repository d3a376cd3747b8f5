//! Core dispatcher types and traits

pub mod dispatcher;
pub mod error;
pub mod log_entry;
pub mod log_level;
pub mod metrics;
pub mod sink;

pub use dispatcher::{Logger, LoggerBuilder, LoggerConfig, DEFAULT_SHUTDOWN_TIMEOUT};
pub use error::{Result, SinkError};
pub use log_entry::{CallSite, LogEntry};
pub use log_level::{LogLevel, SeverityClass};
pub use metrics::DispatchMetrics;
pub use sink::Sink;
