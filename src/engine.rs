//! Engine facade.
//!
//! Setup happens on an [`EngineBuilder`], which owns the mutable type and
//! command registries. [`EngineBuilder::start`] freezes both behind `Arc`
//! and hands back a [`CommandEngine`] that is safe to share between threads.

use std::sync::Arc;

use tracing::info;

use crate::caller::{ActorDirectory, CallerRef};
use crate::commands::{
    CommandDescriptor, CommandRegistry, Completer, DispatchOutcome, Dispatcher, ShutdownGate,
};
use crate::config::{Config, MessagesConfig};
use crate::error::Result;
use crate::types::{Kind, TypeAdapter, TypeRegistry};
use crate::worker::WorkerPool;

/// Setup-phase handle. Types must be registered before the commands that
/// use them.
pub struct EngineBuilder {
    types: TypeRegistry,
    commands: CommandRegistry,
    messages: MessagesConfig,
    shutdown: Option<ShutdownGate>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    /// Builder with default messages and no default capability.
    pub fn new() -> Self {
        Self {
            types: TypeRegistry::new(),
            commands: CommandRegistry::new(),
            messages: MessagesConfig::default(),
            shutdown: None,
        }
    }

    /// Builder using the configured messages and default capability.
    ///
    /// An empty `default_capability` leaves undeclared commands open.
    pub fn from_config(config: &Config) -> Self {
        let commands = match config.engine.default_capability.trim() {
            "" => CommandRegistry::new(),
            capability => CommandRegistry::with_default_capability(capability),
        };

        Self {
            types: TypeRegistry::new(),
            commands,
            messages: config.messages.clone(),
            shutdown: None,
        }
    }

    /// Registers an adapter for a new kind.
    pub fn register_type(&mut self, kind: Kind, adapter: impl TypeAdapter + 'static) -> Result<()> {
        self.types.register(kind, adapter)
    }

    /// Registers an adapter, replacing any existing one for the kind.
    pub fn register_type_replacing(&mut self, kind: Kind, adapter: impl TypeAdapter + 'static) {
        self.types.register_replacing(kind, adapter);
    }

    /// Installs the built-in adapters. Fails on a second call.
    pub fn install_builtin_types(&mut self, directory: Arc<dyn ActorDirectory>) -> Result<()> {
        self.types.install_builtins(directory)
    }

    /// Validates and registers a command.
    pub fn register_command(&mut self, descriptor: CommandDescriptor) -> Result<()> {
        self.commands.register(descriptor, &self.types).map(|_| ())
    }

    /// Routes the gate's command, when run by a non-interactive caller, to
    /// its hook instead of the command behavior.
    pub fn shutdown_gate(&mut self, gate: ShutdownGate) {
        self.shutdown = Some(gate);
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    /// Freezes the registries and starts serving lines.
    pub fn start(self, workers: WorkerPool) -> CommandEngine {
        info!(
            commands = self.commands.len(),
            kinds = self.types.kinds().len(),
            shutdown_gate = self.shutdown.is_some(),
            "Command engine started"
        );

        let mut dispatcher = Dispatcher::new(
            Arc::new(self.commands),
            Arc::new(self.types),
            self.messages,
            workers,
        );
        if let Some(gate) = self.shutdown {
            dispatcher = dispatcher.with_shutdown_gate(gate);
        }

        CommandEngine { dispatcher }
    }
}

/// Running engine. Read-only apart from the worker pool.
pub struct CommandEngine {
    dispatcher: Dispatcher,
}

impl CommandEngine {
    /// See [`Dispatcher::dispatch_line`].
    pub fn dispatch_line(&self, caller: &CallerRef, line: &str) -> DispatchOutcome {
        self.dispatcher.dispatch_line(caller, line)
    }

    /// See [`Dispatcher::dispatch_root`].
    pub fn dispatch_root(&self, caller: &CallerRef, label: &str, args: &[&str]) -> DispatchOutcome {
        self.dispatcher.dispatch_root(caller, label, args)
    }

    /// Completion candidates for a partially typed line.
    pub fn complete(&self, caller: &CallerRef, partial_line: &str) -> Vec<String> {
        Completer::new(self.dispatcher.commands(), self.dispatcher.types())
            .complete(caller, partial_line)
    }

    /// Root words a front-end should intercept.
    pub fn roots(&self) -> Vec<String> {
        self.dispatcher.commands().roots().map(str::to_string).collect()
    }

    pub fn commands(&self) -> &CommandRegistry {
        self.dispatcher.commands()
    }

    /// Stops accepting asynchronous jobs and waits for queued ones to start.
    pub async fn close(self) -> Result<()> {
        self.dispatcher.into_workers().close().await
    }
}
