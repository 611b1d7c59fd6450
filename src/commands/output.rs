//! Transport-agnostic dispatch outcomes.
//!
//! `dispatch_line` never fails: every line ends in one of these values and
//! the front-end decides what a miss means for its own text interception.

use std::fmt;

/// Why a found command was not invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// A non-interactive caller tried an interactive-only command.
    ConsoleNotAllowed,
    /// The caller lacks the required capability.
    NoPermission,
    /// A parameter was missing or failed coercion.
    BindingFailed,
    /// The background worker pool refused the job.
    WorkerUnavailable,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConsoleNotAllowed => "console-not-allowed",
            Self::NoPermission => "no-permission",
            Self::BindingFailed => "binding-failed",
            Self::WorkerUnavailable => "worker-unavailable",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of dispatching one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No command recognized the line.
    NotFound,
    /// A command was found but not invoked.
    Rejected(RejectReason),
    /// The behavior ran (synchronous) or was queued (asynchronous).
    Invoked,
}

impl DispatchOutcome {
    /// True when some command claimed the line, invoked or not.
    pub fn is_found(&self) -> bool {
        !matches!(self, Self::NotFound)
    }
}
