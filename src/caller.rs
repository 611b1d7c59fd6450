//! Caller capability contract.
//!
//! The engine never inspects concrete actor types. Everything it needs to know
//! about whoever typed a line goes through [`Caller`].

use std::fmt;
use std::sync::Arc;

/// Whoever submitted a line: an interactive user or an unattended caller
/// such as a console or RPC client.
///
/// Implementations must be thread-safe because asynchronous commands run
/// their behavior on a background worker.
pub trait Caller: Send + Sync {
    /// Display name, also used by the online-actor adapter for lookups.
    fn name(&self) -> &str;

    /// Whether this caller is an interactive user.
    fn is_interactive(&self) -> bool;

    /// Whether this caller bypasses capability checks (operator).
    fn is_administrator(&self) -> bool;

    /// Whether this caller holds the given capability token.
    fn has_capability(&self, capability: &str) -> bool;

    /// Delivers a message to the caller. Fire-and-forget.
    fn send(&self, text: &str);

    /// Whether the named actor is visible to this caller.
    fn can_see(&self, _name: &str) -> bool {
        true
    }
}

/// Shared handle to a caller.
pub type CallerRef = Arc<dyn Caller>;

/// Lookup of actors that are currently online.
pub trait ActorDirectory: Send + Sync {
    /// Finds an online actor by name.
    fn find_online(&self, name: &str) -> Option<CallerRef>;

    /// Lists every online actor.
    fn online(&self) -> Vec<CallerRef>;
}

/// Directory with nobody online, for engines without an actor concept.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoActors;

impl ActorDirectory for NoActors {
    fn find_online(&self, _name: &str) -> Option<CallerRef> {
        None
    }

    fn online(&self) -> Vec<CallerRef> {
        Vec::new()
    }
}

/// Debug-friendly label for a caller.
pub(crate) struct CallerLabel<'a>(pub &'a dyn Caller);

impl fmt::Display for CallerLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.0.is_interactive() {
            "user"
        } else {
            "console"
        };
        write!(f, "{}:{}", kind, self.0.name())
    }
}
