//! Tab completion.
//!
//! A line that is exactly one of the caller's aliases completes the first
//! parameter of that command. Any other line completes the next alias word,
//! enumerated from the aliases the caller may use.

use crate::caller::CallerRef;
use crate::text::{eq_ignore_case, split_partial, starts_with_ignore_case};
use crate::types::{Kind, TypeRegistry};

use super::definitions::{CommandDescriptor, ParamSpec};
use super::registry::CommandRegistry;

/// Computes completion candidates for partially typed lines.
#[derive(Clone, Copy)]
pub struct Completer<'a> {
    commands: &'a CommandRegistry,
    types: &'a TypeRegistry,
}

impl<'a> Completer<'a> {
    pub fn new(commands: &'a CommandRegistry, types: &'a TypeRegistry) -> Self {
        Self { commands, types }
    }

    /// Candidates for the word being typed at the end of `line`.
    ///
    /// Every candidate starts with that word (ignoring case) and appears
    /// once, in first-seen order.
    pub fn complete(&self, caller: &CallerRef, line: &str) -> Vec<String> {
        if let Some(descriptor) = self.exact_alias(caller, line) {
            // The cursor is still on the last alias word until a space follows it.
            if !line.ends_with(char::is_whitespace) {
                return Vec::new();
            }
            return descriptor
                .params()
                .first()
                .map(|param| self.complete_param(caller, param))
                .unwrap_or_default();
        }

        let (words, partial) = split_partial(line);
        let mut suggestions = Vec::new();
        push_unique(&mut suggestions, self.enumerate(caller, &words, partial));
        suggestions
    }

    /// The accessible command owning an alias equal to the whole line.
    fn exact_alias(&self, caller: &CallerRef, line: &str) -> Option<&'a CommandDescriptor> {
        let typed: Vec<&str> = line.split_whitespace().collect();
        let root = typed.first()?;

        self.commands
            .by_root(root)
            .iter()
            .filter(|d| d.can_access(caller.as_ref()))
            .find(|d| {
                d.aliases().iter().any(|alias| {
                    let declared: Vec<&str> = alias.split_whitespace().collect();
                    declared.len() == typed.len()
                        && declared.iter().zip(&typed).all(|(a, b)| eq_ignore_case(a, b))
                })
            })
            .map(|d| &**d)
    }

    /// Next alias word for every accessible command whose alias begins with
    /// the typed words.
    fn enumerate(&self, caller: &CallerRef, words: &[&str], partial: &str) -> Vec<String> {
        let buckets: Vec<&str> = match words.first() {
            Some(root) => vec![*root],
            None => self.commands.roots().collect(),
        };

        let mut found = Vec::new();
        for root in buckets {
            let accessible = self
                .commands
                .by_root(root)
                .iter()
                .filter(|d| d.can_access(caller.as_ref()));

            for descriptor in accessible {
                for alias in descriptor.aliases() {
                    let alias_words: Vec<&str> = alias.split_whitespace().collect();
                    let Some(next) = alias_words.get(words.len()) else {
                        continue;
                    };
                    let in_bucket = alias_words
                        .first()
                        .is_some_and(|first| eq_ignore_case(first, root));
                    let typed_matches = words
                        .iter()
                        .zip(&alias_words)
                        .all(|(typed, declared)| eq_ignore_case(typed, declared));

                    if in_bucket && typed_matches && starts_with_ignore_case(next, partial) {
                        found.push(next.to_string());
                    }
                }
            }
        }
        found
    }

    fn complete_param(&self, caller: &CallerRef, param: &ParamSpec) -> Vec<String> {
        if param.kind == Kind::STRING {
            return Vec::new();
        }
        match self.types.lookup(&param.kind) {
            Ok(adapter) => adapter.complete(caller, &param.completion_hints, ""),
            Err(_) => Vec::new(),
        }
    }
}

/// Appends candidates not already present, ignoring case. The first casing
/// seen is kept.
fn push_unique(into: &mut Vec<String>, candidates: Vec<String>) {
    for candidate in candidates {
        if !into.iter().any(|seen| eq_ignore_case(seen, &candidate)) {
            into.push(candidate);
        }
    }
}
