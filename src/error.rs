//! Error types for cmdroute.
//!
//! Setup-time failures (type and command registration, configuration, worker
//! pool plumbing). Per-call outcomes such as a missed resolution or a failed
//! binding are plain values, see [`crate::commands::DispatchOutcome`].

use thiserror::Error;

/// Main error type for cmdroute operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// A type adapter is already registered for this kind.
    #[error("Duplicate kind: an adapter for '{0}' is already registered")]
    DuplicateKind(String),

    /// No type adapter is registered for this kind.
    #[error("Unknown kind: no adapter registered for '{0}'")]
    UnknownKind(String),

    /// The built-in adapters were installed twice.
    #[error("Type registry already initialized")]
    AlreadyInitialized,

    /// A command descriptor violates a structural invariant.
    #[error("Invalid descriptor '{command}': {reason}")]
    InvalidDescriptor { command: String, reason: String },

    /// An alias is already claimed by another registered command.
    #[error("Duplicate alias '{alias}' (already registered by '{owner}')")]
    DuplicateAlias { alias: String, owner: String },

    /// Configuration errors (unreadable file, invalid TOML, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The background worker pool is closed or unavailable.
    #[error("Worker error: {0}")]
    Worker(String),

    /// Internal errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CommandError {
    /// Creates an invalid descriptor error.
    pub fn invalid_descriptor(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            command: command.into(),
            reason: reason.into(),
        }
    }

    /// Creates a duplicate alias error.
    pub fn duplicate_alias(alias: impl Into<String>, owner: impl Into<String>) -> Self {
        Self::DuplicateAlias {
            alias: alias.into(),
            owner: owner.into(),
        }
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a worker error with the given message.
    pub fn worker(msg: impl Into<String>) -> Self {
        Self::Worker(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::DuplicateKind(_) | Self::UnknownKind(_) | Self::AlreadyInitialized => {
                "Type Registry Error"
            }
            Self::InvalidDescriptor { .. } | Self::DuplicateAlias { .. } => {
                "Command Registry Error"
            }
            Self::Config(_) => "Configuration Error",
            Self::Worker(_) => "Worker Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using CommandError.
pub type Result<T> = std::result::Result<T, CommandError>;
