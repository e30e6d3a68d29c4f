//! Error types for netpath
//!
//! This module defines the error hierarchy of the path engine.
//! Errors are split by how a caller must react to them:
//!
//! - [`TopologyError`]: structural problems. The graph or the engine state
//!   is inconsistent; continuing would produce wrong results, so the run
//!   must stop.
//! - [`PathError`]: per-query problems. A single source/destination pair has
//!   no valid path; the caller reports it and continues with other rules.
//! - [`ConfigError`]: configuration and topology description loading.

use std::fmt;
use std::io;

use thiserror::Error;

/// Top-level error type for netpath
#[derive(Debug, Error)]
pub enum NetpathError {
    /// Configuration errors (file parsing, validation)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Structural topology errors
    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    /// Path query errors
    #[error("Path error: {0}")]
    Path(#[from] PathError),

    /// I/O errors not covered by other categories
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl NetpathError {
    /// Check if this error is recoverable (processing may continue with
    /// the next query)
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Config(_) | Self::Topology(_) => false,
            Self::Path(e) => e.is_recoverable(),
            Self::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
            ),
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File not found or inaccessible
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Validation error (invalid values, unknown references)
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// Environment variable error
    #[error("Environment variable error: {name}: {reason}")]
    EnvError { name: String, reason: String },

    /// I/O error while reading config
    #[error("I/O error reading configuration: {0}")]
    IoError(#[from] io::Error),
}

/// Structural errors of the topology graph or of the engine state.
///
/// None of these is recoverable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// No zone at all was handed to the engine
    #[error("topology seems to be empty")]
    EmptyTopology,

    /// A query was issued before `prepare_traversal`
    #[error("path traversal has not been prepared")]
    NotPrepared,

    /// Two objects of the same kind share one name
    #[error("duplicate {kind} name: {name}")]
    DuplicateName { kind: &'static str, name: String },

    /// An index handed to the builder does not belong to it
    #[error("unknown {kind} index {index}")]
    ForeignIndex { kind: &'static str, index: usize },

    /// A node was expected to be part of a loop cluster
    #[error("{node} is not located inside a loop")]
    NotInLoop { node: String },

    /// A loop marker has no cluster exit after reduction
    #[error("loop with exit {exit} has not been reduced")]
    LoopNotReduced { exit: String },

    /// Navigation inside a loop cluster yielded no transition
    #[error("empty navigation from {from} to {to}")]
    MissingNavigation { from: String, to: String },

    /// The memoized path data of a marked path is incomplete
    #[error("incomplete path data at {at} towards {to}")]
    IncompletePath { at: String, to: String },
}

impl TopologyError {
    /// Create a duplicate name error
    pub fn duplicate(kind: &'static str, name: impl Into<String>) -> Self {
        Self::DuplicateName {
            kind,
            name: name.into(),
        }
    }

    /// Create an incomplete path error
    pub fn incomplete(at: impl Into<String>, to: impl Into<String>) -> Self {
        Self::IncompletePath {
            at: at.into(),
            to: to.into(),
        }
    }

    /// Structural errors are never recoverable
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        false
    }
}

/// Explanation attached to a "No valid path" error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoPathReason {
    /// Source and destination are in different topology partitions
    DifferentPartitions { src: String, dst: String },

    /// Candidate routes were blocked by path restrictions.
    ///
    /// Pairs of restriction name and number of blocked path attempts,
    /// ordered by attempts, then by name.
    Blocked { restrictions: Vec<(String, usize)> },

    /// No further information available
    Unknown,
}

impl fmt::Display for NoPathReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DifferentPartitions { src, dst } => write!(
                f,
                " Source and destination objects are located in different topology partitions: {src}, {dst}."
            ),
            Self::Blocked { restrictions } => {
                writeln!(f, " Possible blocking pathrestrictions:")?;
                for (name, count) in restrictions {
                    writeln!(f, "  - {name} (blocked {count} path attempts)")?;
                }
                write!(f, " Check path restrictions and crypto interfaces.")
            }
            Self::Unknown => write!(f, " Check path restrictions and crypto interfaces."),
        }
    }
}

/// Errors of a single path query
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Source and destination are not connected by any valid path
    #[error("No valid path\n from {from}\n to {to}\n {context}\n{reason}")]
    NoValidPath {
        from: String,
        to: String,
        context: String,
        reason: NoPathReason,
    },

    /// A read-only walk found no marked path
    #[error("path from {from} to {to} has not been marked")]
    NotMarked { from: String, to: String },

    /// Structural error hit while answering the query
    #[error(transparent)]
    Topology(#[from] TopologyError),
}

impl PathError {
    /// Check if this error only affects the current query
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::NoValidPath { .. } | Self::NotMarked { .. } => true,
            Self::Topology(_) => false,
        }
    }
}

/// Result type alias using `NetpathError`
pub type Result<T> = std::result::Result<T, NetpathError>;
