//! Sink trait for log output destinations

use super::{error::Result, event::LogEvent};

/// Destination that writes enriched events
///
/// Implementations may fail with an error or even panic; the logger catches
/// both and never lets them reach the calling code.
pub trait Sink: Send {
    fn emit(&mut self, event: &LogEvent) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;

    /// Release buffered memory that is no longer needed
    fn compact(&mut self) {}
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn emit(&mut self, event: &LogEvent) -> Result<()> {
        (**self).emit(event)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn compact(&mut self) {
        (**self).compact()
    }
}
