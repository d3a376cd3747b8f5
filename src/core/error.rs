//! Error types for the logging core

pub type Result<T> = std::result::Result<T, SinkError>;

/// Errors produced inside sinks.
///
/// These never reach `Logger::log` callers; worker lanes consume them and
/// drop the affected entry for that sink only.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Entry could not be encoded for this sink's storage representation
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// File sink error with path
    #[error("file sink error for '{path}': {message}")]
    FileSink { path: String, message: String },

    /// File rotation error
    #[error("file rotation failed for '{path}': {message}")]
    Rotation { path: String, message: String },

    /// Writer error (generic)
    #[error("writer error: {0}")]
    Writer(String),
}

impl SinkError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        SinkError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a file sink error
    pub fn file_sink(path: impl Into<String>, message: impl Into<String>) -> Self {
        SinkError::FileSink {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file rotation error
    pub fn rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        SinkError::Rotation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        SinkError::Writer(msg.into())
    }
}
