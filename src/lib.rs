//! cmdroute - a text-command routing engine.
//!
//! Applications declare commands (aliases, a capability, typed parameters
//! and a behavior) once at startup. At runtime the engine resolves raw lines
//! to commands, checks who may run them, converts the argument tokens to
//! typed values and invokes the behavior, in-line or on a background worker.
//! It also answers tab-completion queries from the same declarations.

pub mod caller;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod text;
pub mod types;
pub mod worker;

pub use caller::{ActorDirectory, Caller, CallerRef};
pub use commands::{CommandDescriptor, DispatchOutcome, ParamSpec, RejectReason};
pub use engine::{CommandEngine, EngineBuilder};
pub use error::{CommandError, Result};
pub use types::{Kind, TypeAdapter, Value};
