//! Text helpers shared by resolution, binding and completion.
//!
//! All matching in the engine is case-insensitive but case-preserving: these
//! helpers compare folded characters and hand back slices of the original.

/// Strips `prefix` from the start of `text`, comparing case-insensitively.
///
/// Returns the remainder of `text` (original casing) on a match.
pub fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let mut chars = text.chars();

    for expected in prefix.chars() {
        let actual = chars.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }

    Some(chars.as_str())
}

/// Returns true if `text` starts with `prefix`, ignoring case.
pub fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    strip_prefix_ignore_case(text, prefix).is_some()
}

/// Returns true if both strings are equal, ignoring case.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    strip_prefix_ignore_case(a, b).is_some_and(str::is_empty)
}

/// Splits a partially typed line into its completed words and the word
/// currently being typed.
///
/// The partial word is empty when the line is empty or ends in whitespace.
pub fn split_partial(line: &str) -> (Vec<&str>, &str) {
    let mut words: Vec<&str> = line.split_whitespace().collect();

    let ends_with_space = line.chars().last().is_some_and(char::is_whitespace);
    if ends_with_space || words.is_empty() {
        return (words, "");
    }

    let partial = words.pop().unwrap_or_default();
    (words, partial)
}

/// Re-joins tokens from `start` onward with single spaces.
pub fn join_from(tokens: &[String], start: usize) -> String {
    tokens.get(start..).unwrap_or_default().join(" ")
}
