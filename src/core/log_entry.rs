//! Log entry structure

use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Origin of a log call, captured at the call site.
///
/// The [`call_site!`](crate::call_site) macro fills this from `file!()`,
/// `module_path!()` and `line!()`; host applications wrapping the logger
/// can construct it by hand instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub function: &'static str,
    pub line: u32,
}

/// Immutable record of one log event.
///
/// Created exactly once, at call time; the dispatcher shares read-only
/// references with every sink and nothing mutates an entry afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub source_file: String,
    pub source_function: String,
    pub source_line: u32,
}

impl LogEntry {
    /// Escape control characters so line-delimited sink formats cannot be
    /// corrupted or spoofed by message content.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, message: String, site: CallSite) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: Self::sanitize_message(&message),
            source_file: site.file.to_string(),
            source_function: site.function.to_string(),
            source_line: site.line,
        }
    }

    /// Last path component of the source file, the form every sink format
    /// displays.
    pub fn file_name(&self) -> &str {
        Path::new(&self.source_file)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.source_file)
    }

    /// Short clock form (`HH:MM:SS.mmm`) used by the export blocks.
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format("%H:%M:%S%.3f").to_string()
    }

    /// ISO-8601 form with millisecond precision used by the file sink.
    pub fn iso_timestamp(&self) -> String {
        self.timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
    }
}
