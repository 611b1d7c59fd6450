//! Built-in type adapters.

use std::sync::Arc;

use super::{CoercionError, TypeAdapter, Value};
use crate::caller::{ActorDirectory, CallerRef};
use crate::text::{eq_ignore_case, starts_with_ignore_case};

type CoerceResult = std::result::Result<Value, CoercionError>;

const BOOLEAN_LITERALS: [(&str, bool); 6] = [
    ("true", true),
    ("on", true),
    ("oui", true),
    ("false", false),
    ("off", false),
    ("non", false),
];

/// `true/on/oui` vs `false/off/non`, case-insensitive.
#[derive(Debug, Default, Clone, Copy)]
pub struct BooleanAdapter;

impl TypeAdapter for BooleanAdapter {
    fn coerce(&self, _caller: &CallerRef, raw: &str) -> CoerceResult {
        BOOLEAN_LITERALS
            .iter()
            .find(|(literal, _)| eq_ignore_case(raw, literal))
            .map(|(_, value)| Value::Bool(*value))
            .ok_or_else(|| CoercionError::new("You must enter 'true' or 'false'."))
    }

    fn complete(&self, _caller: &CallerRef, _hints: &[String], partial: &str) -> Vec<String> {
        BOOLEAN_LITERALS
            .iter()
            .filter(|(literal, _)| starts_with_ignore_case(literal, partial))
            .map(|(literal, _)| literal.to_string())
            .collect()
    }
}

/// 32-bit signed integer.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntegerAdapter;

impl TypeAdapter for IntegerAdapter {
    fn coerce(&self, _caller: &CallerRef, raw: &str) -> CoerceResult {
        raw.parse::<i32>()
            .map(Value::Int)
            .map_err(|_| CoercionError::new(format!("{raw} is not a valid number.")))
    }
}

/// Parses a finite float written without scientific notation.
fn parse_plain_float<T>(raw: &str) -> std::result::Result<T, CoercionError>
where
    T: std::str::FromStr + Into<f64> + Copy,
{
    if raw.contains(['e', 'E']) {
        return Err(CoercionError::new(format!("{raw} is not a valid number.")));
    }

    match raw.parse::<T>() {
        Ok(parsed) if parsed.into().is_finite() => Ok(parsed),
        _ => Err(CoercionError::new("This number is not valid.")),
    }
}

/// 32-bit float; rejects scientific notation, NaN and infinities.
#[derive(Debug, Default, Clone, Copy)]
pub struct FloatAdapter;

impl TypeAdapter for FloatAdapter {
    fn coerce(&self, _caller: &CallerRef, raw: &str) -> CoerceResult {
        parse_plain_float::<f32>(raw).map(Value::Float)
    }
}

/// 64-bit float with the same rules as [`FloatAdapter`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DoubleAdapter;

impl TypeAdapter for DoubleAdapter {
    fn coerce(&self, _caller: &CallerRef, raw: &str) -> CoerceResult {
        parse_plain_float::<f64>(raw).map(Value::Double)
    }
}

/// An online actor, looked up by name.
///
/// `self` (any case) or an empty token resolves to the caller itself when
/// the caller is interactive.
pub struct ActorAdapter {
    directory: Arc<dyn ActorDirectory>,
}

impl ActorAdapter {
    pub fn new(directory: Arc<dyn ActorDirectory>) -> Self {
        Self { directory }
    }
}

impl TypeAdapter for ActorAdapter {
    fn coerce(&self, caller: &CallerRef, raw: &str) -> CoerceResult {
        if raw.is_empty() || eq_ignore_case(raw, "self") {
            if caller.is_interactive() {
                return Ok(Value::Actor(Arc::clone(caller)));
            }
            return Err(CoercionError::new(
                "A player name is required when running this from the console.",
            ));
        }

        self.directory
            .find_online(raw)
            .map(Value::Actor)
            .ok_or_else(|| CoercionError::new("That player is not online."))
    }

    fn complete(&self, caller: &CallerRef, _hints: &[String], partial: &str) -> Vec<String> {
        self.directory
            .online()
            .iter()
            .map(|actor| actor.name())
            .filter(|name| starts_with_ignore_case(name, partial) && caller.can_see(name))
            .map(str::to_string)
            .collect()
    }
}

/// Raw text, returned unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct StringAdapter;

impl TypeAdapter for StringAdapter {
    fn coerce(&self, _caller: &CallerRef, raw: &str) -> CoerceResult {
        Ok(Value::Str(raw.to_string()))
    }
}
