//! Trait abstractions for the logging capability
//!
//! Components log through [`Logger`] so that the sink (tracing, a test
//! recorder, nothing at all) is chosen by whoever builds the component.

use std::fmt::{self, Debug};
use std::sync::Arc;

/// A structured key/value pair attached to a log record
pub type LogField = (&'static str, String);

/// Shared, thread-safe handle to a logger
pub type SharedLogger = Arc<dyn Logger>;

/// Log severity levels understood by every [`Logger`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Injected logging capability
///
/// Implementors only need [`Logger::log`]; the level helpers forward to it.
pub trait Logger: Send + Sync + Debug {
    /// Emit a record at `level` with structured `fields`
    fn log(&self, level: LogLevel, message: &str, fields: &[LogField]);

    /// Emit a debug record
    fn debug(&self, message: &str, fields: &[LogField]) {
        self.log(LogLevel::Debug, message, fields);
    }

    /// Emit an info record
    fn info(&self, message: &str, fields: &[LogField]) {
        self.log(LogLevel::Info, message, fields);
    }

    /// Emit a warning record
    fn warn(&self, message: &str, fields: &[LogField]) {
        self.log(LogLevel::Warn, message, fields);
    }

    /// Emit an error record
    fn error(&self, message: &str, fields: &[LogField]) {
        self.log(LogLevel::Error, message, fields);
    }
}

/// Logger that discards every record
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _level: LogLevel, _message: &str, _fields: &[LogField]) {}
}

/// Convenience constructor for a shared [`NoopLogger`]
pub fn noop_logger() -> SharedLogger {
    Arc::new(NoopLogger)
}

/// Render fields as `key=value` pairs separated by spaces
pub(crate) fn render_fields(fields: &[LogField]) -> String {
    fields.iter().map(|(key, value)| format!("{key}={value}")).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Default)]
    struct LevelCollector {
        levels: Mutex<Vec<LogLevel>>,
    }

    impl Logger for LevelCollector {
        fn log(&self, level: LogLevel, _message: &str, _fields: &[LogField]) {
            self.levels.lock().unwrap().push(level);
        }
    }

    #[test]
    fn test_level_helpers_forward_to_log() {
        let logger = LevelCollector::default();
        logger.debug("a", &[]);
        logger.info("b", &[]);
        logger.warn("c", &[]);
        logger.error("d", &[]);

        let levels = logger.levels.lock().unwrap();
        assert_eq!(*levels, vec![LogLevel::Debug, LogLevel::Info, LogLevel::Warn, LogLevel::Error]);
    }

    #[test]
    fn test_render_fields() {
        let fields = vec![("attempt", "2".to_string()), ("delay_ms", "1000".to_string())];
        assert_eq!(render_fields(&fields), "attempt=2 delay_ms=1000");
        assert_eq!(render_fields(&[]), "");
    }

    #[test]
    fn test_noop_logger_accepts_records() {
        let logger = noop_logger();
        logger.error("ignored", &[("k", "v".to_string())]);
    }
}
