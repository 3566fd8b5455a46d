//! Integration tests for the global logging setup.
//!
//! The global subscriber can only be installed once per process, so a single
//! test owns `init_logging`.

use async_trait::async_trait;
use bridge_traits::error::Result as SinkResult;
use bridge_traits::log::{LogEntry, LogLevel, LoggerSink};
use core_runtime::logging::{init_logging, redact_url_query, LogFormat, LoggingConfig};
use core_runtime::Error;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct CapturingSink {
    entries: Mutex<Vec<LogEntry>>,
}

#[async_trait]
impl LoggerSink for CapturingSink {
    async fn log(&self, entry: LogEntry) -> SinkResult<()> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        LogLevel::Debug
    }
}

#[test]
fn test_init_logging_mirrors_events_and_rejects_second_init() {
    let sink = Arc::new(CapturingSink::default());
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug)
        .with_filter("logging_integration=debug")
        .with_logger_sink(sink.clone());

    init_logging(config).expect("first init succeeds");

    tracing::info!(api_key = "imgbb-secret", image_id = "img-9", "image registered");
    tracing::trace!("below the filter");

    {
        let entries = sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "image registered");
        assert_eq!(entries[0].level, LogLevel::Info);
        assert_eq!(entries[0].fields.get("image_id"), Some(&"img-9".to_string()));
        assert_eq!(
            entries[0].fields.get("api_key"),
            Some(&"[REDACTED]".to_string())
        );
    }

    let second = init_logging(LoggingConfig::default());
    assert!(matches!(second, Err(Error::Config(_))));
}

#[test]
fn test_upload_endpoint_is_safe_to_log() {
    let logged = redact_url_query("https://api.imgbb.com/1/upload?key=imgbb-secret");
    assert!(!logged.contains("imgbb-secret"));
    assert!(logged.starts_with("https://api.imgbb.com/1/upload?"));
}

#[test]
fn test_config_chaining() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Json)
        .with_level(LogLevel::Warn)
        .with_secret_redaction(true)
        .with_spans(false)
        .with_target(false);

    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.level, LogLevel::Warn);
    assert!(config.redact_secrets);
    assert!(!config.enable_spans);
    assert!(!config.display_target);
}
