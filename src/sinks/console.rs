//! Console sink implementation

use crate::core::{error::Result, log_entry::LogEntry, log_level::SeverityClass, sink::Sink};
use colored::Colorize;

/// Immediate human-visible echo of entries, for interactive development.
///
/// The line format matches the file sink's minus the timestamp. Entries
/// are routed by severity class: `Error` and `Fault` classes go to
/// stderr, everything else to stdout, so structured-log viewers
/// underneath see the right channel per severity.
pub struct ConsoleSink {
    use_colors: bool,
}

impl ConsoleSink {
    #[must_use]
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    /// Disable colors for dumb terminals or captured output.
    #[must_use]
    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn format_line(&self, entry: &LogEntry) -> String {
        let level_str = if self.use_colors {
            entry
                .level
                .as_str()
                .color(entry.level.color())
                .to_string()
        } else {
            entry.level.as_str().to_string()
        };

        format!(
            "{} [{}] [{}:{}] {} -> {}",
            entry.level.icon(),
            level_str,
            entry.file_name(),
            entry.source_line,
            entry.source_function,
            entry.message
        )
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn accept(&mut self, entry: &LogEntry) -> Result<()> {
        let line = self.format_line(entry);

        match entry.level.severity_class() {
            SeverityClass::Error | SeverityClass::Fault => eprintln!("{}", line),
            _ => println!("{}", line),
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        use std::io::Write;
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
