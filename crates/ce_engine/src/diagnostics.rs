//! Diagnostics reported while boxing and evaluating.
//!
//! Nothing here interrupts a computation: diagnostics are collected on the
//! engine and forwarded to an optional host callback. The callback is
//! isolated so a panicking sink cannot unwind through the engine.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use ce_ast::ErrorCode;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: ErrorCode,
    pub message: String,
    /// Symbol or head the diagnostic is about.
    pub subject: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            subject: None,
        }
    }

    pub fn unbound(name: &str) -> Self {
        Self {
            subject: Some(name.to_string()),
            ..Self::new(
                Severity::Warning,
                ErrorCode::UnboundSymbol,
                format!("'{name}' has no definition"),
            )
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} [{}]: {}", self.severity, self.code, self.message)
    }
}

pub type DiagnosticSink = Box<dyn Fn(&Diagnostic)>;

/// Collected diagnostics plus the host callback.
#[derive(Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
    sink: Option<DiagnosticSink>,
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("items", &self.items)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl Diagnostics {
    /// Upper bound on retained diagnostics; later ones still reach the sink.
    const CAPACITY: usize = 1024;

    pub fn set_sink(&mut self, sink: DiagnosticSink) {
        self.sink = Some(sink);
    }

    pub fn clear_sink(&mut self) {
        self.sink = None;
    }

    /// Record a diagnostic. Duplicates of a retained item are dropped.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        if self.items.contains(&diagnostic) {
            return;
        }
        if let Some(sink) = &self.sink {
            let delivered = panic::catch_unwind(AssertUnwindSafe(|| sink(&diagnostic)));
            if delivered.is_err() {
                warn!(code = %diagnostic.code, "diagnostic sink panicked");
            }
        }
        if self.items.len() < Self::CAPACITY {
            self.items.push(diagnostic);
        }
    }

    pub fn items(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.items)
    }

    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.items.iter().any(|d| d.code == code)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_duplicates_are_dropped() {
        let mut diagnostics = Diagnostics::default();
        diagnostics.report(Diagnostic::unbound("q"));
        diagnostics.report(Diagnostic::unbound("q"));
        diagnostics.report(Diagnostic::unbound("r"));
        assert_eq!(diagnostics.items().len(), 2);
        assert!(diagnostics.has_code(ErrorCode::UnboundSymbol));
        assert_eq!(diagnostics.take().len(), 2);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_sink_sees_each_report() {
        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        let mut diagnostics = Diagnostics::default();
        diagnostics.set_sink(Box::new(move |_| counter.set(counter.get() + 1)));
        diagnostics.report(Diagnostic::unbound("x"));
        diagnostics.report(Diagnostic::unbound("y"));
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn test_panicking_sink_is_contained() {
        let mut diagnostics = Diagnostics::default();
        diagnostics.set_sink(Box::new(|_| panic!("sink failure")));
        diagnostics.report(Diagnostic::unbound("x"));
        assert_eq!(diagnostics.items().len(), 1);
    }
}
