//! Timing hooks injected into the analyzer and layout engine.
//!
//! Components receive an `Arc<dyn Instrumentation>` at construction; there is
//! no process-wide recorder.

use std::sync::Arc;
use std::time::{Duration, Instant};

/// Receives one record per completed operation
pub trait Instrumentation: Send + Sync {
    /// `items` is the number of files (or edges) the operation handled
    fn record(&self, operation: &'static str, elapsed: Duration, items: usize);
}

/// Discards every record
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopInstrumentation;

impl Instrumentation for NoopInstrumentation {
    fn record(&self, _operation: &'static str, _elapsed: Duration, _items: usize) {}
}

/// Emits each record as a `debug` tracing event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingInstrumentation;

impl Instrumentation for TracingInstrumentation {
    fn record(&self, operation: &'static str, elapsed: Duration, items: usize) {
        tracing::debug!(
            operation,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            items,
            "operation completed"
        );
    }
}

/// Default capability for components constructed without one
pub fn noop() -> Arc<dyn Instrumentation> {
    Arc::new(NoopInstrumentation)
}

/// Measures one operation and reports it when finished
pub(crate) struct Timer<'a> {
    sink: &'a dyn Instrumentation,
    operation: &'static str,
    started: Instant,
}

impl<'a> Timer<'a> {
    pub(crate) fn start(sink: &'a dyn Instrumentation, operation: &'static str) -> Self {
        Self {
            sink,
            operation,
            started: Instant::now(),
        }
    }

    pub(crate) fn finish(self, items: usize) {
        self.sink.record(self.operation, self.started.elapsed(), items);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Collects records for assertions
    #[derive(Default)]
    pub(crate) struct Recorder {
        pub(crate) records: Mutex<Vec<(&'static str, usize)>>,
    }

    impl Instrumentation for Recorder {
        fn record(&self, operation: &'static str, _elapsed: Duration, items: usize) {
            self.records.lock().unwrap().push((operation, items));
        }
    }

    #[test]
    fn test_timer_reports_once() {
        let recorder = Recorder::default();
        Timer::start(&recorder, "unit").finish(3);
        assert_eq!(*recorder.records.lock().unwrap(), vec![("unit", 3)]);
    }
}
