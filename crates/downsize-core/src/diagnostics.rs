//! Debug diagnostics.
//!
//! Messages always go to the `log` facade. They reach the caller's
//! [`DiagnosticsSink`] only when `debug` is enabled; with it off the sink is
//! never called.

/// Receives user-facing diagnostic messages.
pub trait DiagnosticsSink {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// A sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticsSink for NoopSink {
    fn info(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// Debug-gated front end for a sink.
pub(crate) struct Diagnostics<'a> {
    sink: &'a dyn DiagnosticsSink,
    enabled: bool,
}

impl<'a> Diagnostics<'a> {
    pub(crate) fn new(sink: &'a dyn DiagnosticsSink, enabled: bool) -> Self {
        Self { sink, enabled }
    }

    pub(crate) fn info(&self, message: &str) {
        log::debug!("{message}");
        if self.enabled {
            self.sink.info(message);
        }
    }

    pub(crate) fn error(&self, message: &str) {
        log::warn!("{message}");
        if self.enabled {
            self.sink.error(message);
        }
    }
}
