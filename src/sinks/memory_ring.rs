//! In-memory ring buffer sink for later inspection and export

use crate::core::{error::Result, log_entry::LogEntry, sink::Sink};
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Default retention bound of the ring.
pub const DEFAULT_RING_CAPACITY: usize = 1000;

/// Capacity-bounded FIFO store of the most recent entries.
///
/// Writes go through the sink's worker lane; `snapshot`, `clear` and
/// `export` are safe from any thread and serialize against concurrent
/// appends on the internal lock. The dispatcher retains its ring by
/// identity, which is why [`Sink`] is implemented for
/// `Arc<MemoryRingSink>` rather than for the sink itself.
pub struct MemoryRingSink {
    capacity: usize,
    entries: Mutex<VecDeque<LogEntry>>,
}

impl MemoryRingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_RING_CAPACITY)
    }

    /// Capacity is clamped to at least one entry.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Append an entry, evicting the single oldest one first when full.
    pub fn push(&self, entry: LogEntry) {
        let mut entries = self.entries.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Consistent copy of the current contents, oldest first.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.lock().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Render the current contents as human-readable text.
    ///
    /// Pure formatting over [`snapshot`](Self::snapshot): a fixed header
    /// with the entry count and export time, then one two-line block per
    /// entry, oldest first, separated by blank lines.
    pub fn export(&self) -> String {
        let entries = self.snapshot();

        let mut out = String::new();
        out.push_str("=== App Logs Export ===\n");
        out.push_str(&format!("Total Logs: {}\n", entries.len()));
        out.push_str(&format!(
            "Export Date: {}\n",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        ));
        out.push_str("========================\n\n");

        for entry in &entries {
            out.push_str(&format!(
                "{} {} [{}] [{}:{}] {}\n",
                entry.formatted_timestamp(),
                entry.level.icon(),
                entry.level.as_str(),
                entry.file_name(),
                entry.source_line,
                entry.source_function
            ));
            out.push_str(&format!("  → {}\n\n", entry.message));
        }

        out
    }
}

impl Default for MemoryRingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for Arc<MemoryRingSink> {
    fn accept(&mut self, entry: &LogEntry) -> Result<()> {
        self.push(entry.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_entry::CallSite;
    use crate::core::log_level::LogLevel;

    fn entry(message: &str) -> LogEntry {
        LogEntry::new(
            LogLevel::Info,
            message.to_string(),
            CallSite {
                file: "src/ring.rs",
                function: "ring::tests",
                line: 7,
            },
        )
    }

    #[test]
    fn test_push_within_capacity() {
        let ring = MemoryRingSink::with_capacity(3);
        ring.push(entry("a"));
        ring.push(entry("b"));
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn test_eviction_is_oldest_first() {
        let ring = MemoryRingSink::with_capacity(3);
        for message in ["a", "b", "c", "d"] {
            ring.push(entry(message));
        }

        let messages: Vec<_> = ring.snapshot().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["b", "c", "d"]);
        assert_eq!(ring.len(), 3);
    }

    #[test]
    fn test_len_never_exceeds_capacity() {
        let ring = MemoryRingSink::with_capacity(5);
        for i in 0..100 {
            ring.push(entry(&format!("m{}", i)));
            assert!(ring.len() <= 5);
        }
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let ring = MemoryRingSink::with_capacity(3);
        ring.push(entry("a"));

        let snapshot = ring.snapshot();
        ring.push(entry("b"));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn test_clear() {
        let ring = MemoryRingSink::with_capacity(3);
        ring.push(entry("a"));
        ring.clear();
        assert!(ring.is_empty());
    }

    #[test]
    fn test_zero_capacity_clamped_to_one() {
        let ring = MemoryRingSink::with_capacity(0);
        ring.push(entry("only"));
        ring.push(entry("newer"));
        let messages: Vec<_> = ring.snapshot().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["newer"]);
    }

    #[test]
    fn test_export_header_and_blocks() {
        let ring = MemoryRingSink::with_capacity(10);
        ring.push(entry("first"));
        ring.push(entry("second"));

        let export = ring.export();
        assert!(export.starts_with("=== App Logs Export ===\n"));
        assert!(export.contains("Total Logs: 2\n"));
        assert!(export.contains("Export Date: "));
        assert!(export.contains("  → first\n"));
        assert!(export.contains("  → second\n"));
        assert!(export.contains("[INFO]"));
        assert!(export.contains("[ring.rs:7]"));

        // Oldest first.
        let first_pos = export.find("first").unwrap();
        let second_pos = export.find("second").unwrap();
        assert!(first_pos < second_pos);
    }

    #[test]
    fn test_export_empty_ring() {
        let ring = MemoryRingSink::new();
        let export = ring.export();
        assert!(export.contains("Total Logs: 0\n"));
    }

    #[test]
    fn test_sink_impl_appends() {
        let ring = Arc::new(MemoryRingSink::with_capacity(2));
        let mut handle = Arc::clone(&ring);
        handle.accept(&entry("via sink")).unwrap();

        assert_eq!(ring.len(), 1);
        assert_eq!(ring.snapshot()[0].message, "via sink");
    }
}
