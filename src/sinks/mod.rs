//! Reference sink implementations

pub mod memory;
pub mod null;

#[cfg(feature = "console")]
pub mod console;

#[cfg(feature = "file")]
pub mod file;

pub use memory::MemorySink;
pub use null::NullSink;

#[cfg(feature = "console")]
pub use console::ConsoleSink;

#[cfg(feature = "file")]
pub use file::FileSink;

// Re-export the trait for implementors
pub use crate::core::Sink;
