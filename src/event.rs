//! Injectable log sink and clock.
//!
//! Diagnostics are routed through a [`Logger`] owned by the component that
//! emits them rather than through process-wide state, so two documents can
//! log to different places and tests can capture output. Timing uses a
//! [`Clock`] for the same reason.

use std::fmt;
use std::time::{Duration, Instant};

/// Log level for debug callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

type LogCallback = Box<dyn Fn(LogLevel, &str) + 'static>;

/// Optional log callback with a minimum level.
pub struct Logger {
    callback: Option<LogCallback>,
    min_level: LogLevel,
}

impl Default for Logger {
    fn default() -> Self {
        Self::disabled()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("enabled", &self.callback.is_some())
            .field("min_level", &self.min_level)
            .finish()
    }
}

impl Logger {
    /// A logger that drops every message.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            callback: None,
            min_level: LogLevel::Debug,
        }
    }

    /// Route messages to `callback`.
    #[must_use]
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(LogLevel, &str) + 'static,
    {
        Self {
            callback: Some(Box::new(callback)),
            min_level: LogLevel::Debug,
        }
    }

    /// Drop messages below `level`.
    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Whether a message at `level` would reach the callback.
    #[must_use]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.callback.is_some() && level >= self.min_level
    }

    /// Emit a log message.
    pub fn emit(&self, level: LogLevel, message: &str) {
        if level < self.min_level {
            return;
        }
        if let Some(callback) = self.callback.as_ref() {
            callback(level, message);
        }
    }

    /// Emit a lazily formatted message; `message` only runs when enabled.
    pub fn emit_with<F>(&self, level: LogLevel, message: F)
    where
        F: FnOnce() -> String,
    {
        if self.enabled(level) {
            self.emit(level, &message());
        }
    }

    pub fn debug(&self, message: &str) {
        self.emit(LogLevel::Debug, message);
    }

    pub fn warn(&self, message: &str) {
        self.emit(LogLevel::Warn, message);
    }
}

/// Monotonic time source.
pub trait Clock {
    fn now(&self) -> Instant;

    /// Time elapsed since `start`.
    fn elapsed(&self, start: Instant) -> Duration {
        self.now().saturating_duration_since(start)
    }
}

/// [`Clock`] backed by [`Instant::now`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_log_callback() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let logger = Logger::new(move |level, msg| {
            sink.borrow_mut().push((level, msg.to_string()));
        });
        logger.emit(LogLevel::Info, "hello");
        assert_eq!(*seen.borrow(), vec![(LogLevel::Info, "hello".to_string())]);
    }

    #[test]
    fn test_min_level_filters() {
        let seen = Rc::new(RefCell::new(0usize));
        let sink = Rc::clone(&seen);
        let logger = Logger::new(move |_, _| *sink.borrow_mut() += 1)
            .with_min_level(LogLevel::Warn);
        logger.debug("dropped");
        logger.emit_with(LogLevel::Info, || unreachable!("not formatted"));
        logger.warn("kept");
        assert_eq!(*seen.borrow(), 1);
        assert!(!logger.enabled(LogLevel::Debug));
    }

    #[test]
    fn test_disabled_logger_is_silent() {
        let logger = Logger::disabled();
        assert!(!logger.enabled(LogLevel::Error));
        logger.emit(LogLevel::Error, "nowhere");
    }

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock;
        let start = clock.now();
        assert!(clock.now() >= start);
        assert!(clock.elapsed(start) < Duration::from_secs(60));
    }
}
