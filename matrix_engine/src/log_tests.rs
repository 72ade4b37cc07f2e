//! Unit tests for log.rs
//!
//! Tests LogSeverity ordering, LogEntry construction, DefaultLogger output
//! and the engine_err!/engine_bail! helpers.

use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
use crate::error::{Error, Result};
use std::time::SystemTime;

fn entry(severity: LogSeverity, file: Option<&'static str>, line: Option<u32>) -> LogEntry {
    LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: "matrix::Test".to_string(),
        message: format!("{:?} message", severity),
        file,
        line,
    }
}

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_debug() {
    assert_eq!(format!("{:?}", LogSeverity::Trace), "Trace");
    assert_eq!(format!("{:?}", LogSeverity::Error), "Error");
}

// ============================================================================
// LOG ENTRY TESTS
// ============================================================================

#[test]
fn test_log_entry_with_file_line() {
    let e = entry(LogSeverity::Error, Some("compositor.rs"), Some(42));
    assert_eq!(e.severity, LogSeverity::Error);
    assert_eq!(e.source, "matrix::Test");
    assert_eq!(e.file, Some("compositor.rs"));
    assert_eq!(e.line, Some(42));
}

#[test]
fn test_log_entry_clone() {
    let e1 = entry(LogSeverity::Warn, None, None);
    let e2 = e1.clone();
    assert_eq!(e1.severity, e2.severity);
    assert_eq!(e1.message, e2.message);
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
fn test_default_logger_all_severities() {
    let logger = DefaultLogger;
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
    ] {
        logger.log(&entry(severity, None, None));
    }
}

#[test]
fn test_default_logger_error_with_location() {
    DefaultLogger.log(&entry(LogSeverity::Error, Some("log_tests.rs"), Some(7)));
}

// ============================================================================
// ERROR MACRO TESTS
// ============================================================================

#[test]
fn test_engine_err_builds_backend_error() {
    let err = crate::engine_err!("matrix::Test", "bad handle {}", 7);
    assert_eq!(err, Error::BackendError("bad handle 7".to_string()));
}

#[test]
fn test_engine_bail_returns_early() {
    fn bails(flag: bool) -> Result<u32> {
        if flag {
            crate::engine_bail!("matrix::Test", "bailing with {}", "reason");
        }
        Ok(1)
    }

    assert_eq!(bails(false), Ok(1));
    assert_eq!(bails(true), Err(Error::BackendError("bailing with reason".to_string())));
}
