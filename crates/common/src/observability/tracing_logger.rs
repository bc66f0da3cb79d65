//! [`Logger`] implementation that forwards records to `tracing`

use tracing::{debug, error, info, warn};

use super::traits::{render_fields, LogField, LogLevel, Logger};

/// Production logger backed by the `tracing` macros
///
/// `component` is attached to every event so subscribers can filter by the
/// emitting subsystem (e.g. `"resilience"` or `"fallback"`).
#[derive(Debug, Clone, Copy)]
pub struct TracingLogger {
    component: &'static str,
}

impl TracingLogger {
    /// Create a logger tagged with `component`
    pub const fn new(component: &'static str) -> Self {
        Self { component }
    }

    /// Component tag attached to every event
    pub const fn component(&self) -> &'static str {
        self.component
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new("namewizard")
    }
}

/// Record fields lifted into first-class `tracing` fields
///
/// Keys outside this set are rendered into a single `fields` value.
#[derive(Debug, Default, PartialEq, Eq)]
struct EventFields<'a> {
    operation: Option<&'a str>,
    candidate: Option<&'a str>,
    attempt: Option<&'a str>,
    max_attempts: Option<&'a str>,
    delay_ms: Option<&'a str>,
    error: Option<&'a str>,
    last_error: Option<&'a str>,
    rest: Option<String>,
}

impl<'a> EventFields<'a> {
    fn split(fields: &'a [LogField]) -> Self {
        let mut event = Self::default();
        let mut rest = Vec::new();

        for (key, value) in fields {
            let slot = match *key {
                "operation" => &mut event.operation,
                "candidate" => &mut event.candidate,
                "attempt" => &mut event.attempt,
                "max_attempts" => &mut event.max_attempts,
                "delay_ms" => &mut event.delay_ms,
                "error" => &mut event.error,
                "last_error" => &mut event.last_error,
                _ => {
                    rest.push((*key, value.clone()));
                    continue;
                }
            };
            *slot = Some(value.as_str());
        }

        if !rest.is_empty() {
            event.rest = Some(render_fields(&rest));
        }
        event
    }
}

macro_rules! emit_event {
    ($macro:ident, $component:expr, $event:expr, $message:expr) => {
        $macro!(
            component = $component,
            operation = $event.operation,
            candidate = $event.candidate,
            attempt = $event.attempt,
            max_attempts = $event.max_attempts,
            delay_ms = $event.delay_ms,
            error = $event.error,
            last_error = $event.last_error,
            fields = $event.rest.as_deref(),
            "{}",
            $message
        )
    };
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str, fields: &[LogField]) {
        let event = EventFields::split(fields);
        match level {
            LogLevel::Debug => emit_event!(debug, self.component, event, message),
            LogLevel::Info => emit_event!(info, self.component, event, message),
            LogLevel::Warn => emit_event!(warn, self.component, event, message),
            LogLevel::Error => emit_event!(error, self.component, event, message),
        }
    }
}
