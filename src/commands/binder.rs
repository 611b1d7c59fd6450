//! Parameter binding.
//!
//! Turns the residual tokens of a resolved line into typed values, one per
//! declared parameter, through the type registry.

use std::sync::Arc;

use thiserror::Error;

use crate::caller::CallerRef;
use crate::text::join_from;
use crate::types::{Kind, TypeRegistry, Value};

use super::definitions::CommandDescriptor;

/// Why binding stopped. The message is meant for the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// A mandatory parameter got no token.
    #[error("{usage}")]
    MissingRequiredParameter { param: String, usage: String },

    /// The adapter rejected a token.
    #[error("{message}")]
    CoercionFailed { param: String, message: String },

    /// No adapter is registered for the parameter's kind.
    #[error("No adapter registered for '{kind}'")]
    UnknownKind { param: String, kind: String },
}

/// Binds residual tokens to a descriptor's parameters.
#[derive(Clone, Copy)]
pub struct Binder<'a> {
    types: &'a TypeRegistry,
}

impl<'a> Binder<'a> {
    pub fn new(types: &'a TypeRegistry) -> Self {
        Self { types }
    }

    /// Produces the bound arguments: the caller followed by one value per
    /// parameter.
    ///
    /// `alias_used` only feeds the usage string of a missing-parameter error.
    pub fn bind(
        &self,
        caller: &CallerRef,
        descriptor: &CommandDescriptor,
        alias_used: &str,
        tokens: &[String],
    ) -> Result<Vec<Value>, BindError> {
        let mut bound = Vec::with_capacity(descriptor.params().len() + 1);
        bound.push(Value::Caller(Arc::clone(caller)));

        for (i, param) in descriptor.params().iter().enumerate() {
            let supplied = tokens.get(i);
            if supplied.is_none() && param.is_required() {
                return Err(BindError::MissingRequiredParameter {
                    param: param.name.clone(),
                    usage: descriptor.usage(alias_used),
                });
            }

            let mut token = supplied
                .map(String::as_str)
                .unwrap_or(&param.default_value)
                .trim()
                .to_string();

            if param.wildcard && token != param.default_value.trim() {
                token = join_from(tokens, i);
            }

            bound.push(self.coerce(caller, &param.kind, &param.name, &token)?);

            if param.wildcard {
                break;
            }
        }

        Ok(bound)
    }

    fn coerce(
        &self,
        caller: &CallerRef,
        kind: &Kind,
        param: &str,
        token: &str,
    ) -> Result<Value, BindError> {
        if *kind == Kind::STRING {
            return Ok(Value::Str(token.to_string()));
        }

        let adapter = self.types.lookup(kind).map_err(|_| BindError::UnknownKind {
            param: param.to_string(),
            kind: kind.to_string(),
        })?;

        adapter
            .coerce(caller, token)
            .map_err(|e| BindError::CoercionFailed {
                param: param.to_string(),
                message: e.to_string(),
            })
    }
}
