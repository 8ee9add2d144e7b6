//! Integration tests for logging system

use bridge_traits::error::Result as SinkResult;
use bridge_traits::log::{LogEntry, LogLevel, LoggerSink};
use core_runtime::logging::{
    init_logging, redact_if_sensitive, text_preview, LogFormat, LoggingConfig,
};
use std::sync::{Arc, Mutex};

#[test]
fn test_logging_config_chaining() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Warn)
        .with_target(false)
        .with_thread_info(true);

    assert_eq!(config.format, LogFormat::Compact);
    assert_eq!(config.level, LogLevel::Warn);
    assert!(!config.display_target);
    assert!(config.display_thread_info);
}

#[test]
fn test_credential_redaction() {
    assert_eq!(redact_if_sensitive("api_key", "gsk_abc"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("authorization", "Bearer gsk_abc"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("client_secret", "s"), "[REDACTED]");
}

#[test]
fn test_normal_values_pass_through() {
    assert_eq!(redact_if_sensitive("session_id", "12"), "12");
    assert_eq!(redact_if_sensitive("backend", "decoded-buffer"), "decoded-buffer");
}

#[test]
fn test_selected_text_preview() {
    let text = "The quick brown fox jumps over the lazy dog";
    assert_eq!(text_preview(text, 9), "The quick… (43 chars)");
    assert_eq!(text_preview("short", 32), "short");
}

#[test]
fn test_invalid_filter_is_rejected() {
    let config = LoggingConfig::default().with_filter("core_playback=[");
    assert!(init_logging(config).is_err());
}

#[derive(Default)]
struct CollectingSink {
    entries: Mutex<Vec<LogEntry>>,
}

impl LoggerSink for CollectingSink {
    fn log(&self, entry: LogEntry) -> SinkResult<()> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        LogLevel::Debug
    }
}

// The global subscriber can only be installed once per test binary, so every
// assertion about the installed pipeline lives in this one test.
#[test]
fn test_init_logging_forwards_to_sink() {
    let sink = Arc::new(CollectingSink::default());
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug)
        .with_logger_sink(sink.clone());

    init_logging(config).expect("first initialization succeeds");

    tracing::debug!(target: "core_playback::session", session_id = 3u64, "progress tick");
    tracing::trace!(target: "core_playback::session", "below sink level");
    tracing::info!(target: "some_other_crate", "filtered out");

    let entries = sink.entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "progress tick");
    assert_eq!(entries[0].fields.get("session_id"), Some(&"3".to_string()));
    drop(entries);

    assert!(init_logging(LoggingConfig::default()).is_err());
}
