//! Sink trait for log output destinations

use super::{error::Result, log_entry::LogEntry};

/// A destination that durably or visibly records a [`LogEntry`].
///
/// Each registered sink is owned by its own dispatcher worker lane, which
/// serializes every `accept` and `flush` call; implementations do not need
/// internal locking unless they are shared outside the dispatcher.
pub trait Sink: Send {
    fn accept(&mut self, entry: &LogEntry) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}
