//! Command resolution.
//!
//! Finds the registered command a raw line refers to and splits off the
//! residual argument tokens.

use std::sync::Arc;

use crate::text::strip_prefix_ignore_case;

use super::definitions::CommandDescriptor;
use super::registry::CommandRegistry;

/// A line matched against a registered command.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The matched command.
    pub descriptor: Arc<CommandDescriptor>,
    /// The alias that matched, in its declared casing.
    pub alias: String,
    /// Whitespace-split tokens after the alias.
    pub residual: Vec<String>,
}

/// Resolves raw lines against a [`CommandRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct CommandRouter<'a> {
    registry: &'a CommandRegistry,
}

impl<'a> CommandRouter<'a> {
    pub fn new(registry: &'a CommandRegistry) -> Self {
        Self { registry }
    }

    /// Matches `line` against every alias, longest canonical alias first.
    ///
    /// An alias matches when the line equals it or starts with it followed
    /// by a space, ignoring case. Arity is not checked here: missing
    /// parameters are reported by the binder.
    pub fn resolve(&self, line: &str) -> Option<Resolution> {
        self.registry.all().iter().find_map(|descriptor| {
            descriptor.aliases().iter().find_map(|alias| {
                let rest = strip_prefix_ignore_case(line, alias)?;
                let args = if rest.is_empty() {
                    ""
                } else {
                    rest.strip_prefix(' ')?
                };

                Some(Resolution {
                    descriptor: Arc::clone(descriptor),
                    alias: alias.clone(),
                    residual: args.split_whitespace().map(str::to_string).collect(),
                })
            })
        })
    }
}
