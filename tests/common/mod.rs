#![allow(clippy::nursery)] // Test infra prioritizes clarity over pedantry
#![allow(clippy::pedantic)] // Test infra prioritizes clarity over pedantry
#![allow(dead_code)] // Each test binary uses a different subset

use codeedit_engine::layout::{
    BreakMode, LayoutConfiguration, LayoutEngine, LineMetrics, LineRun, MonospaceMeasurer,
    Overscroll, TextMeasurer, Typography,
};
use codeedit_engine::{LogLevel, Logger, TextStorage};
use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

/// Row height produced by [`measurer`]: ascent 8 + descent 2.
pub const ROW_HEIGHT: f64 = 10.0;
/// Normal spacing for [`ROW_HEIGHT`].
pub const ROW_SPACING: f64 = 2.0;
pub const ROW_PITCH: f64 = ROW_HEIGHT + ROW_SPACING;

pub fn measurer() -> MonospaceMeasurer {
    MonospaceMeasurer::new(1.0, ROW_HEIGHT)
}

/// Default configuration without overscroll, so content height is the
/// bottom of the last row.
pub fn config() -> LayoutConfiguration {
    LayoutConfiguration::new().with_overscroll(Overscroll::None)
}

/// Monospace measurer that records every line text it measures.
pub struct CountingMeasurer {
    inner: MonospaceMeasurer,
    measured: RefCell<Vec<String>>,
}

impl CountingMeasurer {
    pub fn new() -> Self {
        Self {
            inner: measurer(),
            measured: RefCell::new(Vec::new()),
        }
    }

    /// Distinct line texts measured since the last reset, in order.
    pub fn measured_lines(&self) -> Vec<String> {
        let mut lines = self.measured.borrow().clone();
        lines.dedup();
        lines
    }

    pub fn reset(&self) {
        self.measured.borrow_mut().clear();
    }
}

impl TextMeasurer for CountingMeasurer {
    fn measure(&self, run: &LineRun<'_>, range: Range<usize>) -> LineMetrics {
        self.measured.borrow_mut().push(run.text.to_string());
        self.inner.measure(run, range)
    }

    fn suggest_break(&self, run: &LineRun<'_>, start: usize, available: f64, mode: BreakMode) -> usize {
        self.inner.suggest_break(run, start, available, mode)
    }

    fn em_width(&self, typography: &Typography) -> f64 {
        self.inner.em_width(typography)
    }

    fn line_height(&self, typography: &Typography) -> f64 {
        self.inner.line_height(typography)
    }
}

/// Text of `count` lines named "line N".
pub fn numbered_lines(count: usize) -> String {
    (0..count)
        .map(|n| format!("line {n}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Storage plus an engine that has completed one pass.
pub fn laid_out(text: &str, config: LayoutConfiguration) -> (TextStorage, LayoutEngine) {
    let storage = TextStorage::with_text(text);
    let mut engine = LayoutEngine::new(config);
    engine.layout(&storage, &measurer(), &Typography::default(), 80.0);
    (storage, engine)
}

/// Logger that appends every message to a shared vector.
pub fn capturing_logger() -> (Logger, Rc<RefCell<Vec<(LogLevel, String)>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let logger = Logger::new(move |level, message| {
        sink.borrow_mut().push((level, message.to_string()));
    });
    (logger, seen)
}

/// Install a test-writer `tracing` subscriber once per binary.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(true)
        .with_test_writer()
        .try_init();
}

/// Logger that forwards engine diagnostics to `tracing`.
pub fn tracing_logger() -> Logger {
    Logger::new(|level, message| match level {
        LogLevel::Debug => tracing::debug!(target: "codeedit_engine", "{message}"),
        LogLevel::Info => tracing::info!(target: "codeedit_engine", "{message}"),
        LogLevel::Warn => tracing::warn!(target: "codeedit_engine", "{message}"),
        LogLevel::Error => tracing::error!(target: "codeedit_engine", "{message}"),
    })
}
