//! Subcommand listings shown when a root word is followed by something
//! no command recognizes.

use crate::caller::Caller;
use crate::text::eq_ignore_case;

use super::registry::CommandRegistry;

/// One `- /<alias> <params>` line per command under `root` that the caller
/// may use, in registration order.
///
/// The alias shown is the first one whose root word is `root`.
pub fn root_listing(registry: &CommandRegistry, caller: &dyn Caller, root: &str) -> Vec<String> {
    registry
        .by_root(root)
        .iter()
        .filter(|descriptor| descriptor.can_access(caller))
        .filter_map(|descriptor| {
            let alias = descriptor.aliases().iter().find(|alias| {
                alias
                    .split_whitespace()
                    .next()
                    .is_some_and(|word| eq_ignore_case(word, root))
            })?;
            let line = format!("- /{} {}", alias, descriptor.param_usage());
            Some(line.trim_end().to_string())
        })
        .collect()
}
