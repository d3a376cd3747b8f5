//! Rotating file sink with size-bounded log files
//!
//! Writes one line per entry to a date-named file in the logs directory
//! and rotates to a timestamped archive before any write that would push
//! the active file past its size threshold.

use crate::core::error::{Result, SinkError};
use crate::core::log_entry::LogEntry;
use crate::core::sink::Sink;
use chrono::{Local, Utc};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default rotation threshold (5 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Append-only, size-bounded persistence to local storage.
///
/// The active file is `log_<YYYY-MM-DD>.txt`; rotation renames it to
/// `log_archive_<epoch-seconds>.txt` in the same directory and starts a
/// fresh file. The running byte counter is seeded from file metadata once
/// at open and maintained per write, never re-stat'd. All access happens
/// on the sink's worker lane, so the counter cannot diverge from the true
/// file size.
pub struct RotatingFileSink {
    logs_dir: PathBuf,
    active_path: PathBuf,
    max_file_size: u64,
    writer: Option<BufWriter<File>>,
    current_size: u64,
}

impl RotatingFileSink {
    /// Create the logs directory if needed and open today's file for
    /// append.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created; the
    /// dispatcher degrades to the remaining sinks in that case.
    pub fn new<P: AsRef<Path>>(logs_dir: P) -> Result<Self> {
        Self::with_max_size(logs_dir, DEFAULT_MAX_FILE_SIZE)
    }

    /// Like [`new`](Self::new) with a custom rotation threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub fn with_max_size<P: AsRef<Path>>(logs_dir: P, max_file_size: u64) -> Result<Self> {
        let logs_dir = logs_dir.as_ref().to_path_buf();

        fs::create_dir_all(&logs_dir).map_err(|e| {
            SinkError::io_operation(
                "create logs directory",
                format!("cannot create '{}'", logs_dir.display()),
                e,
            )
        })?;

        let active_path = logs_dir.join(format!("log_{}.txt", Local::now().format("%Y-%m-%d")));
        let (writer, current_size) = Self::open_active(&active_path)?;

        Ok(Self {
            logs_dir,
            active_path,
            max_file_size,
            writer: Some(writer),
            current_size,
        })
    }

    fn open_active(path: &Path) -> Result<(BufWriter<File>, u64)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                SinkError::file_sink(path.display().to_string(), format!("failed to open: {}", e))
            })?;

        let current_size = file
            .metadata()
            .map_err(|e| {
                SinkError::file_sink(
                    path.display().to_string(),
                    format!("cannot access file metadata: {}", e),
                )
            })?
            .len();

        Ok((BufWriter::new(file), current_size))
    }

    /// Pick an archive path that does not clobber an archive from a
    /// rotation in the same second.
    fn archive_path(&self) -> PathBuf {
        let epoch = Utc::now().timestamp();
        let candidate = self.logs_dir.join(format!("log_archive_{}.txt", epoch));
        if !candidate.exists() {
            return candidate;
        }

        let mut suffix = 1u32;
        loop {
            let candidate = self
                .logs_dir
                .join(format!("log_archive_{}_{}.txt", epoch, suffix));
            if !candidate.exists() {
                return candidate;
            }
            suffix += 1;
        }
    }

    /// Close the active file, move it aside, start a fresh one.
    fn rotate(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                SinkError::rotation(
                    self.active_path.display().to_string(),
                    format!("failed to flush before rotation: {}", e),
                )
            })?;
        }

        let archive = self.archive_path();
        fs::rename(&self.active_path, &archive).map_err(|e| {
            SinkError::rotation(
                self.active_path.display().to_string(),
                format!("failed to archive to '{}': {}", archive.display(), e),
            )
        })?;

        let (writer, current_size) = Self::open_active(&self.active_path)?;
        self.writer = Some(writer);
        self.current_size = current_size;

        Ok(())
    }

    fn format_line(entry: &LogEntry) -> String {
        format!(
            "{} {} [{}] [{}:{}] {} -> {}\n",
            entry.iso_timestamp(),
            entry.level.icon(),
            entry.level.as_str(),
            entry.file_name(),
            entry.source_line,
            entry.source_function,
            entry.message
        )
    }

    /// Location of the active log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.active_path
    }

    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    #[must_use]
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }
}

impl Sink for RotatingFileSink {
    fn accept(&mut self, entry: &LogEntry) -> Result<()> {
        let line = Self::format_line(entry);
        let line_len = line.len() as u64;

        // Rotation is a pre-write check: the decision uses the pending
        // line's size, so a freshly rotated file never exceeds the
        // threshold. An empty active file is never rotated; there is
        // nothing to archive yet.
        if self.current_size > 0 && self.current_size + line_len > self.max_file_size {
            self.rotate()?;
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| SinkError::writer("file writer not initialized"))?;

        writer.write_all(line.as_bytes()).map_err(|e| {
            SinkError::file_sink(
                self.active_path.display().to_string(),
                format!("failed to write log entry: {}", e),
            )
        })?;
        self.current_size += line_len;

        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                SinkError::file_sink(
                    self.active_path.display().to_string(),
                    format!("failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for RotatingFileSink {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_entry::CallSite;
    use crate::core::log_level::LogLevel;
    use tempfile::tempdir;

    fn entry(message: &str) -> LogEntry {
        LogEntry::new(
            LogLevel::Info,
            message.to_string(),
            CallSite {
                file: "src/worker.rs",
                function: "worker::run",
                line: 19,
            },
        )
    }

    fn archives(dir: &Path) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("log_archive_"))
            })
            .collect();
        found.sort();
        found
    }

    #[test]
    fn test_active_file_is_date_named() {
        let dir = tempdir().unwrap();
        let sink = RotatingFileSink::new(dir.path()).unwrap();

        let name = sink.path().file_name().unwrap().to_str().unwrap();
        let expected = format!("log_{}.txt", Local::now().format("%Y-%m-%d"));
        assert_eq!(name, expected);
        assert_eq!(sink.current_size(), 0);
    }

    #[test]
    fn test_size_seeded_from_existing_file() {
        let dir = tempdir().unwrap();
        {
            let mut sink = RotatingFileSink::new(dir.path()).unwrap();
            sink.accept(&entry("persisted")).unwrap();
            sink.flush().unwrap();
        }

        let sink = RotatingFileSink::new(dir.path()).unwrap();
        let on_disk = fs::metadata(sink.path()).unwrap().len();
        assert_eq!(sink.current_size(), on_disk);
        assert!(on_disk > 0);
    }

    #[test]
    fn test_line_format() {
        let dir = tempdir().unwrap();
        let mut sink = RotatingFileSink::new(dir.path()).unwrap();
        sink.accept(&entry("request served")).unwrap();
        sink.flush().unwrap();

        let content = fs::read_to_string(sink.path()).unwrap();
        let line = content.lines().next().unwrap();
        assert!(line.contains(" ℹ️ [INFO] [worker.rs:19] worker::run -> request served"));
        // Leads with an ISO-8601 timestamp.
        let ts = line.split(' ').next().unwrap();
        assert!(ts.contains('T') && ts.ends_with('Z'));
    }

    #[test]
    fn test_rotation_is_pre_write() {
        let dir = tempdir().unwrap();
        let mut sink = RotatingFileSink::with_max_size(dir.path(), 100).unwrap();

        // Each line is well over the 100 byte threshold on its own.
        let long = "x".repeat(120);

        // First write: the file is empty, so it lands without rotation.
        sink.accept(&entry(&long)).unwrap();
        sink.flush().unwrap();
        let first_size = fs::metadata(sink.path()).unwrap().len();
        assert!(first_size > 100);
        assert!(archives(dir.path()).is_empty());

        // Second write rotates first: the oversized file is archived and
        // the fresh file holds exactly the new line.
        sink.accept(&entry(&long)).unwrap();
        sink.flush().unwrap();

        let archived = archives(dir.path());
        assert_eq!(archived.len(), 1);
        assert_eq!(fs::metadata(&archived[0]).unwrap().len(), first_size);
        assert_eq!(
            fs::metadata(sink.path()).unwrap().len(),
            sink.current_size()
        );
        assert_eq!(fs::read_to_string(sink.path()).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_same_second_rotations_do_not_clobber_archives() {
        let dir = tempdir().unwrap();
        let mut sink = RotatingFileSink::with_max_size(dir.path(), 100).unwrap();

        let long = "y".repeat(150);
        for _ in 0..5 {
            sink.accept(&entry(&long)).unwrap();
        }
        sink.flush().unwrap();

        // Five oversized writes mean four rotations; every archive must
        // survive even though they all happen within one second.
        assert_eq!(archives(dir.path()).len(), 4);
    }

    #[test]
    fn test_small_lines_accumulate_without_rotation() {
        let dir = tempdir().unwrap();
        let mut sink = RotatingFileSink::with_max_size(dir.path(), 10_000).unwrap();

        for i in 0..20 {
            sink.accept(&entry(&format!("tick {}", i))).unwrap();
        }
        sink.flush().unwrap();

        assert!(archives(dir.path()).is_empty());
        assert_eq!(
            fs::metadata(sink.path()).unwrap().len(),
            sink.current_size()
        );
        assert_eq!(
            fs::read_to_string(sink.path()).unwrap().lines().count(),
            20
        );
    }

    #[test]
    fn test_archive_name_shape() {
        let dir = tempdir().unwrap();
        let mut sink = RotatingFileSink::with_max_size(dir.path(), 50).unwrap();

        let long = "z".repeat(80);
        sink.accept(&entry(&long)).unwrap();
        sink.accept(&entry(&long)).unwrap();
        sink.flush().unwrap();

        let archived = archives(dir.path());
        assert_eq!(archived.len(), 1);
        let name = archived[0].file_name().unwrap().to_str().unwrap();
        let epoch = name
            .trim_start_matches("log_archive_")
            .trim_end_matches(".txt");
        assert!(epoch.parse::<i64>().is_ok(), "unexpected name {}", name);
    }
}
