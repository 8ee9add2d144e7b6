//! Browser console log sink.

use bridge_traits::{
    error::Result as BridgeResult,
    log::{LogEntry, LogLevel, LoggerSink},
};
use web_sys::console;

/// Forwards rendered entries to `console.*` at the matching severity.
#[derive(Debug, Clone)]
pub struct ConsoleLogSink {
    min_level: LogLevel,
}

impl ConsoleLogSink {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Default for ConsoleLogSink {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

impl LoggerSink for ConsoleLogSink {
    fn log(&self, entry: LogEntry) -> BridgeResult<()> {
        if entry.level < self.min_level {
            return Ok(());
        }
        let line = entry.render().into();
        match entry.level {
            LogLevel::Error => console::error_1(&line),
            LogLevel::Warn => console::warn_1(&line),
            LogLevel::Info => console::info_1(&line),
            LogLevel::Debug | LogLevel::Trace => console::debug_1(&line),
        }
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }
}
