//! Command declaration, resolution, binding, dispatch and completion.
//!
//! Descriptors are declared once through [`CommandDescriptor::builder`] and
//! collected in a [`CommandRegistry`]. At runtime a line flows through the
//! [`CommandRouter`], the [`Binder`] and finally the [`Dispatcher`], which
//! owns every user-visible reaction. The [`Completer`] shares the router and
//! the type registry but never invokes anything.

pub mod binder;
pub mod completion;
pub mod definitions;
pub mod dispatcher;
pub mod help;
pub mod output;
pub mod registry;
pub mod router;

pub use binder::{BindError, Binder};
pub use completion::Completer;
pub use definitions::{Behavior, CommandBuilder, CommandDescriptor, ParamSpec};
pub use dispatcher::{Dispatcher, ShutdownGate, ShutdownHook};
pub use output::{DispatchOutcome, RejectReason};
pub use registry::CommandRegistry;
pub use router::{CommandRouter, Resolution};
