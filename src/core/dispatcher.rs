//! Dispatcher owning the sink registry and the per-sink worker lanes

use super::{
    log_entry::{CallSite, LogEntry},
    log_level::LogLevel,
    metrics::DispatchMetrics,
    sink::Sink,
};
use crate::sinks::{
    ConsoleSink, MemoryRingSink, RotatingFileSink, DEFAULT_MAX_FILE_SIZE, DEFAULT_RING_CAPACITY,
};
use crossbeam_channel::{bounded, unbounded, Sender};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default timeout for draining worker lanes on shutdown (5 seconds)
///
/// Used when the logger is dropped without explicit shutdown and as the
/// upper bound for each flush acknowledgement.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Construction-time settings for [`Logger`].
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Inclusive severity floor; entries below it are dropped before any
    /// sink sees them.
    pub min_level: LogLevel,
    /// Directory the rotating file sink writes into (created if needed).
    pub logs_dir: PathBuf,
    /// Capacity bound of the in-memory ring.
    pub ring_capacity: usize,
    /// Size threshold that triggers file rotation.
    pub max_file_size: u64,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Verbose,
            logs_dir: PathBuf::from("logs"),
            ring_capacity: DEFAULT_RING_CAPACITY,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

enum LaneMessage {
    Entry(Arc<LogEntry>),
    Flush(Sender<()>),
}

/// One sink plus its dedicated serial execution context.
///
/// The worker thread owns the sink exclusively, so every accept and flush
/// for that sink is strictly ordered, and slow I/O in one lane cannot
/// delay delivery to any other lane.
struct SinkLane {
    name: String,
    sender: Sender<LaneMessage>,
    worker: Option<thread::JoinHandle<()>>,
}

impl SinkLane {
    fn spawn(mut sink: Box<dyn Sink>, metrics: Arc<DispatchMetrics>) -> Self {
        let name = sink.name().to_string();
        let (sender, receiver) = unbounded::<LaneMessage>();

        let worker = thread::spawn(move || {
            for message in receiver {
                match message {
                    LaneMessage::Entry(entry) => match sink.accept(&entry) {
                        Ok(()) => {
                            metrics.record_delivered();
                        }
                        Err(e) => {
                            metrics.record_dropped();
                            eprintln!(
                                "[LOGGER ERROR] sink '{}' dropped an entry: {}",
                                sink.name(),
                                e
                            );
                        }
                    },
                    LaneMessage::Flush(ack) => {
                        if let Err(e) = sink.flush() {
                            eprintln!(
                                "[LOGGER ERROR] sink '{}' flush failed: {}",
                                sink.name(),
                                e
                            );
                        }
                        let _ = ack.send(());
                    }
                }
            }

            // Channel closed: drain is complete, flush once more before exit.
            if let Err(e) = sink.flush() {
                eprintln!(
                    "[LOGGER ERROR] sink '{}' flush failed during shutdown: {}",
                    sink.name(),
                    e
                );
            }
        });

        Self {
            name,
            sender,
            worker: Some(worker),
        }
    }

    /// Close the mailbox and wait for the worker to drain it.
    fn shutdown(mut self, timeout: Duration) {
        drop(self.sender);

        if let Some(handle) = self.worker.take() {
            let start = Instant::now();
            loop {
                if handle.is_finished() {
                    if handle.join().is_err() {
                        eprintln!(
                            "[LOGGER ERROR] worker for sink '{}' panicked during shutdown",
                            self.name
                        );
                    }
                    break;
                }

                if start.elapsed() >= timeout {
                    eprintln!(
                        "[LOGGER WARNING] sink '{}' did not drain within {:?}; \
                         pending entries may be lost",
                        self.name, timeout
                    );
                    break;
                }

                thread::sleep(Duration::from_millis(10));
            }
        }
    }
}

/// Process-wide entry point for emitting log events.
///
/// `log()` only pays for the level check and entry construction on the
/// calling thread; accepted entries are handed to one worker lane per
/// sink and the call returns without waiting on any sink I/O. Per-sink
/// delivery is FIFO in submission order; no ordering holds across sinks.
///
/// Construct one instance at startup and hand it (or an `Arc` of it) to
/// call sites; independent instances stay independent, which is what the
/// tests rely on.
///
/// # Example
///
/// ```no_run
/// use fanlog::{info, Logger, LogLevel};
///
/// let logger = Logger::builder()
///     .min_level(LogLevel::Debug)
///     .logs_dir("logs")
///     .build();
///
/// info!(logger, "server listening on port {}", 8080);
/// logger.flush();
/// println!("{}", logger.export_logs());
/// ```
pub struct Logger {
    min_level: RwLock<LogLevel>,
    lanes: RwLock<Vec<SinkLane>>,
    /// Retained by identity so the read API never traverses the registry.
    memory: Arc<MemoryRingSink>,
    file_path: Option<PathBuf>,
    metrics: Arc<DispatchMetrics>,
}

impl Logger {
    /// Create a logger with the default sink trio (console, rotating
    /// file, memory ring) and default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LoggerConfig::default())
    }

    /// Create a logger with the default sink trio, registered in fixed
    /// order: console, rotating file, memory ring.
    ///
    /// Construction never fails: if the logs directory or active file
    /// cannot be created the file sink is skipped for this instance and
    /// the remaining sinks still run.
    #[must_use]
    pub fn with_config(config: LoggerConfig) -> Self {
        let metrics = Arc::new(DispatchMetrics::new());
        let memory = Arc::new(MemoryRingSink::with_capacity(config.ring_capacity));
        let mut lanes = Vec::new();

        lanes.push(SinkLane::spawn(
            Box::new(ConsoleSink::new()),
            Arc::clone(&metrics),
        ));

        let mut file_path = None;
        match RotatingFileSink::with_max_size(&config.logs_dir, config.max_file_size) {
            Ok(sink) => {
                file_path = Some(sink.path().to_path_buf());
                lanes.push(SinkLane::spawn(Box::new(sink), Arc::clone(&metrics)));
            }
            Err(e) => {
                eprintln!("[LOGGER ERROR] file sink disabled: {}", e);
            }
        }

        lanes.push(SinkLane::spawn(
            Box::new(Arc::clone(&memory)),
            Arc::clone(&metrics),
        ));

        Self {
            min_level: RwLock::new(config.min_level),
            lanes: RwLock::new(lanes),
            memory,
            file_path,
            metrics,
        }
    }

    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Set the inclusive severity floor. Takes effect for subsequent
    /// calls only; in-flight entries are unaffected.
    pub fn set_min_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    pub fn min_level(&self) -> LogLevel {
        *self.min_level.read()
    }

    /// Register an additional sink behind the built-in trio. Safe to call
    /// concurrently with in-flight log calls; a racing call sees either
    /// the pre- or post-mutation registry.
    pub fn add_sink(&self, sink: Box<dyn Sink>) {
        let lane = SinkLane::spawn(sink, Arc::clone(&self.metrics));
        self.lanes.write().push(lane);
    }

    /// Shut down and remove every registered sink, draining each lane.
    ///
    /// The memory ring stays retained for the read API, so
    /// [`memory_logs`](Self::memory_logs) keeps serving whatever the ring
    /// last held.
    pub fn remove_all_sinks(&self) {
        let drained: Vec<SinkLane> = self.lanes.write().drain(..).collect();
        for lane in drained {
            lane.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
        }
    }

    /// Emit one log event.
    ///
    /// Below the severity floor this is a no-op; otherwise the entry is
    /// constructed once and a shared reference is handed to every lane.
    /// Never blocks on sink I/O and never returns an error: sink
    /// failures degrade to that sink dropping the entry.
    pub fn log(&self, level: LogLevel, message: impl Into<String>, site: CallSite) {
        if level < *self.min_level.read() {
            return;
        }

        let entry = Arc::new(LogEntry::new(level, message.into(), site));
        let lanes = self.lanes.read();
        for lane in lanes.iter() {
            // A closed mailbox means the lane already shut down.
            let _ = lane.sender.send(LaneMessage::Entry(Arc::clone(&entry)));
        }
    }

    #[inline]
    pub fn verbose(&self, message: impl Into<String>, site: CallSite) {
        self.log(LogLevel::Verbose, message, site);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>, site: CallSite) {
        self.log(LogLevel::Debug, message, site);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>, site: CallSite) {
        self.log(LogLevel::Info, message, site);
    }

    #[inline]
    pub fn warning(&self, message: impl Into<String>, site: CallSite) {
        self.log(LogLevel::Warning, message, site);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>, site: CallSite) {
        self.log(LogLevel::Error, message, site);
    }

    #[inline]
    pub fn critical(&self, message: impl Into<String>, site: CallSite) {
        self.log(LogLevel::Critical, message, site);
    }

    /// Log an arbitrary serializable value as pretty-printed JSON at
    /// Debug level. Values that fail to encode are dropped silently.
    pub fn debug_value<T: serde::Serialize>(&self, title: &str, value: &T, site: CallSite) {
        if LogLevel::Debug < *self.min_level.read() {
            return;
        }

        if let Ok(json) = serde_json::to_string_pretty(value) {
            let message = if title.is_empty() {
                json
            } else {
                format!("{}:\n{}", title, json)
            };
            self.log(LogLevel::Debug, message, site);
        }
    }

    /// Consistent copy of the memory ring, oldest first.
    pub fn memory_logs(&self) -> Vec<LogEntry> {
        self.memory.snapshot()
    }

    pub fn clear_memory_logs(&self) {
        self.memory.clear();
    }

    /// Human-readable export of the memory ring contents.
    pub fn export_logs(&self) -> String {
        self.memory.export()
    }

    /// Location of the active log file, for external tooling. `None`
    /// when the file sink could not be constructed.
    pub fn log_file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    /// Push a barrier through every lane and wait until each sink has
    /// processed everything submitted before it.
    ///
    /// Unlike `log()` this blocks, bounded by
    /// [`DEFAULT_SHUTDOWN_TIMEOUT`] per lane. It is the deterministic
    /// drain point for shutdown and tests.
    pub fn flush(&self) {
        let acks: Vec<_> = {
            let lanes = self.lanes.read();
            lanes
                .iter()
                .filter_map(|lane| {
                    let (ack_tx, ack_rx) = bounded(1);
                    lane.sender
                        .send(LaneMessage::Flush(ack_tx))
                        .ok()
                        .map(|()| ack_rx)
                })
                .collect()
        };

        for ack in acks {
            let _ = ack.recv_timeout(DEFAULT_SHUTDOWN_TIMEOUT);
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.remove_all_sinks();

        let dropped = self.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] logger shutting down with {} dropped deliveries (drop rate: {:.2}%)",
                dropped,
                self.metrics.drop_rate()
            );
        }
    }
}

/// Builder for constructing [`Logger`] with a fluent API
///
/// # Example
/// ```no_run
/// use fanlog::{Logger, LogLevel};
///
/// let logger = Logger::builder()
///     .min_level(LogLevel::Info)
///     .logs_dir("/var/log/app")
///     .ring_capacity(500)
///     .max_file_size(1024 * 1024)
///     .build();
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    extra_sinks: Vec<Box<dyn Sink>>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            extra_sinks: Vec::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.config.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn logs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.logs_dir = dir.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn ring_capacity(mut self, capacity: usize) -> Self {
        self.config.ring_capacity = capacity;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.config.max_file_size = bytes;
        self
    }

    /// Register a custom sink behind the built-in trio.
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.extra_sinks.push(Box::new(sink));
        self
    }

    pub fn build(self) -> Logger {
        let logger = Logger::with_config(self.config);
        for sink in self.extra_sinks {
            logger.add_sink(sink);
        }
        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
