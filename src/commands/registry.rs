//! Command registry.
//!
//! Append-only collection of descriptors, kept sorted longest canonical alias
//! first so that greedy resolution prefers `shop buy` over `shop`, plus an
//! index of descriptors by root word for front-end registration and completion.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{CommandError, Result};
use crate::text::eq_ignore_case;
use crate::types::TypeRegistry;

use super::definitions::CommandDescriptor;

/// Registry of every declared command.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    all: Vec<Arc<CommandDescriptor>>,
    by_root: BTreeMap<String, Vec<Arc<CommandDescriptor>>>,
    default_capability: Option<String>,
}

impl CommandRegistry {
    /// Creates an empty registry. Descriptors without a capability stay open
    /// to every caller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry that assigns `capability` to descriptors
    /// registered without one.
    pub fn with_default_capability(capability: impl Into<String>) -> Self {
        Self {
            default_capability: Some(capability.into()),
            ..Self::default()
        }
    }

    /// Validates and inserts a descriptor.
    ///
    /// Fails with `InvalidDescriptor` on structural violations and with
    /// `DuplicateAlias` when any alias is already claimed; nothing is
    /// inserted in either case.
    pub fn register(
        &mut self,
        descriptor: CommandDescriptor,
        types: &TypeRegistry,
    ) -> Result<Arc<CommandDescriptor>> {
        validate(&descriptor, types)?;

        for alias in descriptor.aliases() {
            if let Some(owner) = self.find_alias(alias) {
                return Err(CommandError::duplicate_alias(alias, owner.name()));
            }
        }

        let descriptor = match &self.default_capability {
            Some(capability) => descriptor.with_default_capability(capability),
            None => descriptor,
        };
        let descriptor = Arc::new(descriptor);

        for root in descriptor.root_words() {
            self.by_root
                .entry(root)
                .or_default()
                .push(Arc::clone(&descriptor));
        }

        self.all.push(Arc::clone(&descriptor));
        // Stable sort: equal lengths keep registration order.
        self.all
            .sort_by(|a, b| b.name().chars().count().cmp(&a.name().chars().count()));

        info!(
            command = descriptor.name(),
            aliases = descriptor.aliases().len(),
            params = descriptor.params().len(),
            "Registered command"
        );
        Ok(descriptor)
    }

    /// Finds the descriptor owning an alias, ignoring case.
    pub fn find_alias(&self, alias: &str) -> Option<&Arc<CommandDescriptor>> {
        self.all
            .iter()
            .find(|d| d.aliases().iter().any(|a| eq_ignore_case(a, alias)))
    }

    /// Every descriptor, longest canonical alias first.
    pub fn all(&self) -> &[Arc<CommandDescriptor>] {
        &self.all
    }

    /// Descriptors declaring an alias that starts with `root`.
    pub fn by_root(&self, root: &str) -> &[Arc<CommandDescriptor>] {
        self.by_root
            .get(&root.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every root word, sorted. One front-end registration per entry.
    pub fn roots(&self) -> impl Iterator<Item = &str> {
        self.by_root.keys().map(String::as_str)
    }

    pub fn is_root(&self, word: &str) -> bool {
        self.by_root.contains_key(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// Checks the structural invariants of a descriptor.
fn validate(descriptor: &CommandDescriptor, types: &TypeRegistry) -> Result<()> {
    let name = descriptor.name();
    let invalid = |reason: String| Err(CommandError::invalid_descriptor(name, reason));

    if descriptor.aliases().iter().any(|a| a.is_empty()) {
        return invalid("aliases must not be empty".to_string());
    }

    for (i, alias) in descriptor.aliases().iter().enumerate() {
        if descriptor.aliases()[..i].iter().any(|a| eq_ignore_case(a, alias)) {
            return invalid(format!("alias '{alias}' is declared twice"));
        }
    }

    let params = descriptor.params();
    let wildcards = params.iter().filter(|p| p.wildcard).count();
    if wildcards > 1 {
        return invalid("at most one wildcard parameter is allowed".to_string());
    }
    if wildcards == 1 && params.last().is_some_and(|p| !p.wildcard) {
        return invalid("wildcard parameter must be last".to_string());
    }

    if let Some(param) = params.iter().find(|p| !types.resolves(&p.kind)) {
        return invalid(format!(
            "parameter '{}' has unknown kind '{}'",
            param.name, param.kind
        ));
    }

    debug!(command = name, "Descriptor validated");
    Ok(())
}
