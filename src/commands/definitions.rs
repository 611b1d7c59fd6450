//! Command definitions.
//!
//! A [`CommandDescriptor`] is the immutable definition of one command: its
//! aliases, the capability it requires, how it runs and the ordered
//! parameters it binds. Descriptors are built with [`CommandDescriptor::builder`]
//! by the embedding application and handed to the registry once.

use std::fmt;
use std::sync::Arc;

use crate::caller::Caller;
use crate::types::{Kind, Value};

/// Behavior invoked with the bound arguments.
///
/// The first argument is always [`Value::Caller`], followed by one value per
/// declared parameter.
pub type Behavior = Arc<dyn Fn(&[Value]) -> anyhow::Result<()> + Send + Sync>;

/// Definition of one argument slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    /// Display name used in usage strings.
    pub name: String,
    /// Type tag resolved against the type registry.
    pub kind: Kind,
    /// Default token; empty means the parameter is mandatory.
    pub default_value: String,
    /// Captures the remainder of the line as one value.
    pub wildcard: bool,
    /// Opaque hints passed to the adapter's completion routine.
    pub completion_hints: Vec<String>,
}

impl ParamSpec {
    /// Creates a mandatory parameter.
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        Self {
            name: name.into(),
            kind,
            default_value: String::new(),
            wildcard: false,
            completion_hints: Vec::new(),
        }
    }

    /// Makes the parameter optional with the given default token.
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    /// Makes the parameter capture the rest of the line.
    pub fn wildcard(mut self) -> Self {
        self.wildcard = true;
        self
    }

    /// Adds a completion hint.
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        let hint = hint.into();
        if !self.completion_hints.contains(&hint) {
            self.completion_hints.push(hint);
        }
        self
    }

    /// Returns true if no default is declared.
    pub fn is_required(&self) -> bool {
        self.default_value.is_empty()
    }

    /// `<name>` when mandatory, `[name]` when defaulted.
    pub fn usage(&self) -> String {
        if self.is_required() {
            format!("<{}>", self.name)
        } else {
            format!("[{}]", self.name)
        }
    }
}

/// Immutable definition of a command.
#[derive(Clone)]
pub struct CommandDescriptor {
    aliases: Vec<String>,
    capability: Option<String>,
    is_async: bool,
    console_eligible: bool,
    params: Vec<ParamSpec>,
    behavior: Behavior,
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("aliases", &self.aliases)
            .field("capability", &self.capability)
            .field("is_async", &self.is_async)
            .field("console_eligible", &self.console_eligible)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl CommandDescriptor {
    /// Starts a descriptor with its canonical alias.
    pub fn builder(name: impl Into<String>) -> CommandBuilder {
        CommandBuilder {
            aliases: vec![normalize_alias(&name.into())],
            capability: None,
            is_async: false,
            console_eligible: true,
            params: Vec::new(),
        }
    }

    /// Canonical (first) alias.
    pub fn name(&self) -> &str {
        self.aliases.first().map(String::as_str).unwrap_or_default()
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Declared capability, if any. The registry fills in the configured
    /// default for descriptors registered without one.
    pub fn capability(&self) -> Option<&str> {
        self.capability.as_deref()
    }

    pub fn is_async(&self) -> bool {
        self.is_async
    }

    pub fn console_eligible(&self) -> bool {
        self.console_eligible
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    /// First word of each alias, lower-cased, without duplicates.
    pub fn root_words(&self) -> Vec<String> {
        let mut roots: Vec<String> = Vec::new();
        for alias in &self.aliases {
            if let Some(root) = alias.split_whitespace().next() {
                let root = root.to_lowercase();
                if !roots.contains(&root) {
                    roots.push(root);
                }
            }
        }
        roots
    }

    /// Whether the caller passes the capability check.
    ///
    /// Non-interactive callers always pass; interactive ones pass when they
    /// are administrators or hold the required capability.
    pub fn can_access(&self, caller: &dyn Caller) -> bool {
        if !caller.is_interactive() || caller.is_administrator() {
            return true;
        }
        self.capability
            .as_deref()
            .map_or(true, |capability| caller.has_capability(capability))
    }

    /// Parameter part of the usage string, e.g. `<amount> [target]`.
    pub fn param_usage(&self) -> String {
        self.params
            .iter()
            .map(ParamSpec::usage)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Usage string for the alias the caller actually typed.
    pub fn usage(&self, alias_used: &str) -> String {
        format!("/{} {}", alias_used.to_lowercase(), self.param_usage().to_lowercase())
            .trim_end()
            .to_string()
    }

    pub(crate) fn with_default_capability(mut self, capability: &str) -> Self {
        if self.capability.is_none() {
            self.capability = Some(capability.to_string());
        }
        self
    }
}

/// Collapses runs of whitespace inside an alias.
fn normalize_alias(alias: &str) -> String {
    alias.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Builder for [`CommandDescriptor`].
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    aliases: Vec<String>,
    capability: Option<String>,
    is_async: bool,
    console_eligible: bool,
    params: Vec<ParamSpec>,
}

impl CommandBuilder {
    /// Adds an alternative alias.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(normalize_alias(&alias.into()));
        self
    }

    /// Sets the capability an interactive caller must hold.
    pub fn capability(mut self, capability: impl Into<String>) -> Self {
        self.capability = Some(capability.into());
        self
    }

    /// Runs the behavior on the background worker pool.
    pub fn run_async(mut self) -> Self {
        self.is_async = true;
        self
    }

    /// Refuses invocation by non-interactive callers.
    pub fn interactive_only(mut self) -> Self {
        self.console_eligible = false;
        self
    }

    /// Appends a parameter.
    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    /// Finishes the descriptor with its behavior.
    pub fn build<F>(self, behavior: F) -> CommandDescriptor
    where
        F: Fn(&[Value]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        CommandDescriptor {
            aliases: self.aliases,
            capability: self.capability,
            is_async: self.is_async,
            console_eligible: self.console_eligible,
            params: self.params,
            behavior: Arc::new(behavior),
        }
    }
}
