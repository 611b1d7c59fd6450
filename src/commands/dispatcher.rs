//! Command dispatch.
//!
//! Orchestrates one line end to end: resolution, console eligibility,
//! capability check, binding and invocation, either in-line or on the
//! background worker pool. Every failure is reported to the caller and
//! turned into a [`DispatchOutcome`]; nothing escapes `dispatch_line`.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::caller::{CallerLabel, CallerRef};
use crate::config::MessagesConfig;
use crate::text::eq_ignore_case;
use crate::types::{TypeRegistry, Value};
use crate::worker::{Job, WorkerPool};

use super::binder::{BindError, Binder};
use super::definitions::CommandDescriptor;
use super::help::root_listing;
use super::output::{DispatchOutcome, RejectReason};
use super::registry::CommandRegistry;
use super::router::CommandRouter;

/// Hook run when a non-interactive caller invokes the shutdown command.
pub type ShutdownHook = Arc<dyn Fn(&CallerRef) + Send + Sync>;

/// Explicit opt-in routing of one command name to a process-level hook.
#[derive(Clone)]
pub struct ShutdownGate {
    command: String,
    hook: ShutdownHook,
}

impl ShutdownGate {
    pub fn new(command: impl Into<String>, hook: impl Fn(&CallerRef) + Send + Sync + 'static) -> Self {
        Self {
            command: command.into(),
            hook: Arc::new(hook),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn applies_to(&self, caller: &CallerRef, descriptor: &CommandDescriptor) -> bool {
        !caller.is_interactive() && eq_ignore_case(descriptor.name(), &self.command)
    }
}

impl fmt::Debug for ShutdownGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShutdownGate")
            .field("command", &self.command)
            .finish_non_exhaustive()
    }
}

/// Routes lines to command behaviors.
pub struct Dispatcher {
    commands: Arc<CommandRegistry>,
    types: Arc<TypeRegistry>,
    messages: Arc<MessagesConfig>,
    workers: WorkerPool,
    shutdown: Option<ShutdownGate>,
}

impl Dispatcher {
    pub fn new(
        commands: Arc<CommandRegistry>,
        types: Arc<TypeRegistry>,
        messages: MessagesConfig,
        workers: WorkerPool,
    ) -> Self {
        Self {
            commands,
            types,
            messages: Arc::new(messages),
            workers,
            shutdown: None,
        }
    }

    /// Installs the shutdown gate.
    pub fn with_shutdown_gate(mut self, gate: ShutdownGate) -> Self {
        self.shutdown = Some(gate);
        self
    }

    pub fn commands(&self) -> &Arc<CommandRegistry> {
        &self.commands
    }

    pub fn types(&self) -> &Arc<TypeRegistry> {
        &self.types
    }

    pub fn workers(&self) -> &WorkerPool {
        &self.workers
    }

    /// Consumes the dispatcher, handing back its worker pool for shutdown.
    pub fn into_workers(self) -> WorkerPool {
        self.workers
    }

    /// Resolves, authorizes, binds and invokes one line.
    pub fn dispatch_line(&self, caller: &CallerRef, line: &str) -> DispatchOutcome {
        let Some(resolution) = CommandRouter::new(&self.commands).resolve(line) else {
            debug!(caller = %CallerLabel(caller.as_ref()), "No command matches input");
            return DispatchOutcome::NotFound;
        };
        let descriptor = &resolution.descriptor;

        if !caller.is_interactive() && !descriptor.console_eligible() {
            debug!(command = descriptor.name(), "Rejected console invocation");
            caller.send(&self.messages.console_not_allowed);
            return DispatchOutcome::Rejected(RejectReason::ConsoleNotAllowed);
        }

        if !descriptor.can_access(caller.as_ref()) {
            debug!(
                command = descriptor.name(),
                caller = %CallerLabel(caller.as_ref()),
                capability = descriptor.capability().unwrap_or_default(),
                "Rejected: missing capability"
            );
            caller.send(&self.messages.no_permission);
            return DispatchOutcome::Rejected(RejectReason::NoPermission);
        }

        if let Some(gate) = self.shutdown.as_ref().filter(|g| g.applies_to(caller, descriptor)) {
            info!(caller = %CallerLabel(caller.as_ref()), "Shutdown requested");
            (gate.hook)(caller);
            return DispatchOutcome::Invoked;
        }

        let args = match Binder::new(&self.types).bind(
            caller,
            descriptor,
            &resolution.alias,
            &resolution.residual,
        ) {
            Ok(args) => args,
            Err(e) => {
                self.report_bind_error(caller, descriptor, &e);
                return DispatchOutcome::Rejected(RejectReason::BindingFailed);
            }
        };

        if !descriptor.is_async() {
            invoke_guarded(descriptor, caller, &args, &self.messages.generic_failure);
            return DispatchOutcome::Invoked;
        }

        let job = {
            let descriptor = Arc::clone(descriptor);
            let caller = Arc::clone(caller);
            let messages = Arc::clone(&self.messages);
            let label = descriptor.name().to_string();
            Job::new(label, move || {
                invoke_guarded(&descriptor, &caller, &args, &messages.generic_failure);
            })
        };

        match self.workers.submit(job) {
            Ok(id) => {
                debug!(job = %id, command = descriptor.name(), "Queued asynchronous command");
                DispatchOutcome::Invoked
            }
            Err(e) => {
                error!(command = descriptor.name(), "Could not queue command: {e}");
                caller.send(&self.messages.generic_failure);
                DispatchOutcome::Rejected(RejectReason::WorkerUnavailable)
            }
        }
    }

    /// Dispatches a line that a front-end received under a root word.
    ///
    /// When nothing matches but `label` is a registered root, the caller is
    /// shown the commands under that root they may use.
    pub fn dispatch_root(&self, caller: &CallerRef, label: &str, args: &[&str]) -> DispatchOutcome {
        let line = if args.is_empty() {
            label.to_string()
        } else {
            format!("{} {}", label, args.join(" "))
        };

        let outcome = self.dispatch_line(caller, &line);
        if outcome == DispatchOutcome::NotFound && self.commands.is_root(label) {
            let listing = root_listing(&self.commands, caller.as_ref(), label);
            if !listing.is_empty() {
                caller.send(&self.messages.unknown_subcommand);
                for line in listing {
                    caller.send(&line);
                }
            }
        }
        outcome
    }

    fn report_bind_error(&self, caller: &CallerRef, descriptor: &CommandDescriptor, err: &BindError) {
        match err {
            BindError::MissingRequiredParameter { usage, .. } => {
                caller.send(&format!("{}{}", self.messages.usage_prefix, usage));
            }
            BindError::CoercionFailed { message, .. } => caller.send(message),
            BindError::UnknownKind { param, kind } => {
                error!(
                    command = descriptor.name(),
                    param = %param,
                    kind = %kind,
                    "Parameter kind has no adapter"
                );
                caller.send(&self.messages.generic_failure);
            }
        }
        debug!(command = descriptor.name(), "Binding failed: {err}");
    }
}

/// Runs a behavior, containing returned errors and panics.
fn invoke_guarded(descriptor: &CommandDescriptor, caller: &CallerRef, args: &[Value], failure_message: &str) {
    let behavior = descriptor.behavior();
    match panic::catch_unwind(AssertUnwindSafe(|| behavior(args))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            error!(
                command = descriptor.name(),
                caller = %CallerLabel(caller.as_ref()),
                usage = %descriptor.usage(descriptor.name()),
                "Command failed: {e:#}"
            );
            caller.send(failure_message);
        }
        Err(payload) => {
            error!(
                command = descriptor.name(),
                caller = %CallerLabel(caller.as_ref()),
                usage = %descriptor.usage(descriptor.name()),
                "Command panicked: {}",
                panic_message(payload.as_ref())
            );
            caller.send(failure_message);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        warn!("Panic payload is not a string");
        "<non-string panic payload>"
    }
}
