//! Type adapters: coercion and completion strategies for parameter kinds.
//!
//! Each parameter declares a [`Kind`]. The [`TypeRegistry`] maps kinds to
//! [`TypeAdapter`]s which turn a raw token into a typed [`Value`] and suggest
//! candidates for a partially typed token.

pub mod builtin;

use std::any::Any;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::caller::{ActorDirectory, CallerRef};
use crate::error::{CommandError, Result};

pub use builtin::{
    ActorAdapter, BooleanAdapter, DoubleAdapter, FloatAdapter, IntegerAdapter, StringAdapter,
};

/// Type tag of a parameter, resolved against the [`TypeRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Kind(Cow<'static, str>);

impl Kind {
    /// `true/on/oui` or `false/off/non`, case-insensitive.
    pub const BOOLEAN: Kind = Kind(Cow::Borrowed("boolean"));
    /// 32-bit signed integer.
    pub const INTEGER: Kind = Kind(Cow::Borrowed("integer"));
    /// 32-bit float, finite, no scientific notation.
    pub const FLOAT: Kind = Kind(Cow::Borrowed("float"));
    /// 64-bit float, finite, no scientific notation.
    pub const DOUBLE: Kind = Kind(Cow::Borrowed("double"));
    /// An actor that is currently online.
    pub const ACTOR: Kind = Kind(Cow::Borrowed("actor"));
    /// Raw text, bound without adapter lookup.
    pub const STRING: Kind = Kind(Cow::Borrowed("string"));

    /// Creates a custom kind.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Returns the kind name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A bound argument.
#[derive(Clone)]
pub enum Value {
    /// The invoking caller, always the first bound value.
    Caller(CallerRef),
    Bool(bool),
    Int(i32),
    Float(f32),
    Double(f64),
    Str(String),
    /// An online actor resolved by the actor adapter.
    Actor(CallerRef),
    /// Value produced by a custom adapter.
    Custom(Arc<dyn Any + Send + Sync>),
}

impl Value {
    pub fn as_caller(&self) -> Option<&CallerRef> {
        match self {
            Self::Caller(caller) => Some(caller),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_actor(&self) -> Option<&CallerRef> {
        match self {
            Self::Actor(actor) => Some(actor),
            _ => None,
        }
    }

    /// Downcasts a custom value.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Custom(value) => value.downcast_ref::<T>(),
            _ => None,
        }
    }
}

fn same_allocation<T: ?Sized, U: ?Sized>(a: &Arc<T>, b: &Arc<U>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

// Callers and custom values compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Caller(a), Self::Caller(b)) | (Self::Actor(a), Self::Actor(b)) => {
                same_allocation(a, b)
            }
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => same_allocation(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Caller(caller) => write!(f, "Caller({})", caller.name()),
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::Int(i) => write!(f, "Int({i})"),
            Self::Float(v) => write!(f, "Float({v})"),
            Self::Double(v) => write!(f, "Double({v})"),
            Self::Str(s) => write!(f, "Str({s:?})"),
            Self::Actor(actor) => write!(f, "Actor({})", actor.name()),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Caller-visible explanation of why a raw token was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct CoercionError(pub String);

impl CoercionError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Coercion and completion strategy for one kind.
pub trait TypeAdapter: Send + Sync {
    /// Turns a raw token into a value, or explains to the caller why it can't.
    fn coerce(&self, caller: &CallerRef, raw: &str) -> std::result::Result<Value, CoercionError>;

    /// Suggests candidates for a partially typed token.
    fn complete(&self, _caller: &CallerRef, _hints: &[String], _partial: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Registry mapping each kind to its adapter.
#[derive(Default)]
pub struct TypeRegistry {
    adapters: HashMap<Kind, Arc<dyn TypeAdapter>>,
    builtins_installed: bool,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in adapters installed.
    pub fn with_builtins(directory: Arc<dyn ActorDirectory>) -> Self {
        let mut registry = Self::new();
        registry.install_builtins_unchecked(directory);
        registry
    }

    /// Registers an adapter, failing if the kind already has one.
    pub fn register(&mut self, kind: Kind, adapter: impl TypeAdapter + 'static) -> Result<()> {
        if self.adapters.contains_key(&kind) {
            return Err(CommandError::DuplicateKind(kind.to_string()));
        }
        debug!(kind = %kind, "Registered type adapter");
        self.adapters.insert(kind, Arc::new(adapter));
        Ok(())
    }

    /// Registers an adapter, replacing any existing one.
    ///
    /// Returns the adapter that was replaced.
    pub fn register_replacing(
        &mut self,
        kind: Kind,
        adapter: impl TypeAdapter + 'static,
    ) -> Option<Arc<dyn TypeAdapter>> {
        debug!(kind = %kind, "Registered type adapter (replacing)");
        self.adapters.insert(kind, Arc::new(adapter))
    }

    /// Installs the built-in adapters.
    ///
    /// Kinds that already have a custom adapter keep it. Fails with
    /// `AlreadyInitialized` on a second call.
    pub fn install_builtins(&mut self, directory: Arc<dyn ActorDirectory>) -> Result<()> {
        if self.builtins_installed {
            return Err(CommandError::AlreadyInitialized);
        }
        self.install_builtins_unchecked(directory);
        Ok(())
    }

    fn install_builtins_unchecked(&mut self, directory: Arc<dyn ActorDirectory>) {
        let builtins: [(Kind, Arc<dyn TypeAdapter>); 6] = [
            (Kind::BOOLEAN, Arc::new(BooleanAdapter)),
            (Kind::INTEGER, Arc::new(IntegerAdapter)),
            (Kind::FLOAT, Arc::new(FloatAdapter)),
            (Kind::DOUBLE, Arc::new(DoubleAdapter)),
            (Kind::ACTOR, Arc::new(ActorAdapter::new(directory))),
            (Kind::STRING, Arc::new(StringAdapter)),
        ];

        for (kind, adapter) in builtins {
            if self.adapters.contains_key(&kind) {
                debug!(kind = %kind, "Keeping custom adapter over built-in");
                continue;
            }
            self.adapters.insert(kind, adapter);
        }
        self.builtins_installed = true;
    }

    /// Looks up the adapter for a kind.
    pub fn lookup(&self, kind: &Kind) -> Result<&Arc<dyn TypeAdapter>> {
        self.adapters
            .get(kind)
            .ok_or_else(|| CommandError::UnknownKind(kind.to_string()))
    }

    /// Returns true if a parameter of this kind can be bound.
    pub fn resolves(&self, kind: &Kind) -> bool {
        *kind == Kind::STRING || self.adapters.contains_key(kind)
    }

    /// Returns the registered kinds, sorted by name.
    pub fn kinds(&self) -> Vec<&Kind> {
        let mut kinds: Vec<_> = self.adapters.keys().collect();
        kinds.sort();
        kinds
    }
}
