//! Minimal logging sink: `(severity, message)` pairs routed into `tracing`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
}

pub trait LogSink {
    fn log(&self, severity: Severity, message: &str);
}

/// Forwards every message to the active `tracing` subscriber, tagged with
/// the name of the component that owns the sink.
#[derive(Debug, Clone)]
pub struct TracingSink {
    class_name: String,
}

impl TracingSink {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }
}

impl LogSink for TracingSink {
    fn log(&self, severity: Severity, message: &str) {
        let class = self.class_name.as_str();
        match severity {
            Severity::Trace => tracing::trace!(class, "{message}"),
            Severity::Debug => tracing::debug!(class, "{message}"),
            Severity::Info => tracing::info!(class, "{message}"),
            Severity::Warning => tracing::warn!(class, "{message}"),
            Severity::Error => tracing::error!(class, "{message}"),
        }
    }
}
