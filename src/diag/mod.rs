//! User-facing diagnostics
//!
//! Errors, warnings and info lines found while preparing the topology or
//! processing rules are collected in a [`Diagnostics`] sink. A *live* sink
//! forwards every message to `tracing` as it arrives; a *buffered* sink
//! keeps them until it is merged into a live one. Background jobs write to
//! buffered sinks so their output does not interleave with the foreground.

mod background;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

pub use background::run_split;

/// Severity of a diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "Info"),
            Self::Warning => write!(f, "Warning"),
            Self::Error => write!(f, "Error"),
        }
    }
}

/// A single diagnostic message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Collector of diagnostic messages
#[derive(Debug, Default)]
pub struct Diagnostics {
    messages: Vec<Diagnostic>,
    buffered: bool,
}

impl Diagnostics {
    /// Create a sink that logs every message immediately
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink that only logs once merged into a live sink
    #[must_use]
    pub fn buffered() -> Self {
        Self {
            messages: Vec::new(),
            buffered: true,
        }
    }

    /// Record an error
    pub fn error(&mut self, msg: impl Into<String>) {
        self.report(Severity::Error, msg);
    }

    /// Record a warning
    pub fn warn(&mut self, msg: impl Into<String>) {
        self.report(Severity::Warning, msg);
    }

    /// Record an info line
    pub fn info(&mut self, msg: impl Into<String>) {
        self.report(Severity::Info, msg);
    }

    /// Record a message of the given severity
    pub fn report(&mut self, severity: Severity, msg: impl Into<String>) {
        let diag = Diagnostic {
            severity,
            message: msg.into(),
        };
        if !self.buffered {
            emit(&diag);
        }
        self.messages.push(diag);
    }

    /// Append the messages of another sink, in their original order
    pub fn merge(&mut self, other: Self) {
        for diag in other.messages {
            if !self.buffered {
                emit(&diag);
            }
            self.messages.push(diag);
        }
    }

    /// All messages recorded so far
    #[must_use]
    pub fn messages(&self) -> &[Diagnostic] {
        &self.messages
    }

    /// Messages of one severity
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &str> {
        self.messages
            .iter()
            .filter(move |d| d.severity == severity)
            .map(|d| d.message.as_str())
    }

    /// Number of errors recorded
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.with_severity(Severity::Error).count()
    }

    /// Number of warnings recorded
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.with_severity(Severity::Warning).count()
    }

    /// True if at least one error was recorded
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// True if nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

fn emit(diag: &Diagnostic) {
    match diag.severity {
        Severity::Error => error!("{}", diag.message),
        Severity::Warning => warn!("{}", diag.message),
        Severity::Info => info!("{}", diag.message),
    }
}
