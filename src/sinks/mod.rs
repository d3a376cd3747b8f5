//! Built-in sink implementations

pub mod console;
pub mod memory_ring;
pub mod rotating_file;

pub use console::ConsoleSink;
pub use memory_ring::{MemoryRingSink, DEFAULT_RING_CAPACITY};
pub use rotating_file::{RotatingFileSink, DEFAULT_MAX_FILE_SIZE};

// Re-export the trait next to its implementations.
pub use crate::core::Sink;
