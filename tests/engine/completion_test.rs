//! Integration tests for tab completion.

use cmdroute::caller::CallerRef;
use pretty_assertions::assert_eq;

use super::common::{shop_engine, RecordingCaller};

fn online() -> Vec<CallerRef> {
    vec![
        RecordingCaller::user("Alice", &[]),
        RecordingCaller::user("albert", &[]),
        RecordingCaller::user("Bob", &[]),
    ]
}

#[tokio::test]
async fn test_root_words_have_no_duplicates() {
    let (engine, _) = shop_engine(online());
    let caller: CallerRef = RecordingCaller::operator("op");

    let suggestions = engine.complete(&caller, "");
    assert_eq!(suggestions, vec!["give", "msg", "shop", "teleport", "tp"]);
}

#[tokio::test]
async fn test_enumeration_hides_inaccessible_commands() {
    let (engine, _) = shop_engine(online());
    let caller: CallerRef = RecordingCaller::user("bob", &["commands.default"]);

    assert_eq!(engine.complete(&caller, "g"), Vec::<String>::new());
    assert_eq!(engine.complete(&caller, "s"), vec!["shop"]);
}

#[tokio::test]
async fn test_exact_alias_switches_to_parameters() {
    let (engine, _) = shop_engine(online());
    let caller: CallerRef = RecordingCaller::operator("op");

    // "shop" takes an integer page, which has no suggestions; "buy" is not offered.
    assert_eq!(engine.complete(&caller, "shop "), Vec::<String>::new());
    assert_eq!(engine.complete(&caller, "tp "), vec!["Alice", "albert", "Bob"]);
}

#[tokio::test]
async fn test_sub_command_word() {
    let (engine, _) = shop_engine(online());
    let caller: CallerRef = RecordingCaller::operator("op");

    assert_eq!(engine.complete(&caller, "give "), vec!["item", "money"]);
    assert_eq!(engine.complete(&caller, "give MO"), vec!["money"]);
    assert_eq!(engine.complete(&caller, "shop b"), vec!["buy"]);
}

#[tokio::test]
async fn test_actor_parameter_only_after_exact_alias() {
    let (engine, _) = shop_engine(online());
    let caller: CallerRef = RecordingCaller::operator("op");

    assert_eq!(engine.complete(&caller, "msg "), vec!["Alice", "albert", "Bob"]);
    assert_eq!(engine.complete(&caller, "msg AL"), Vec::<String>::new());
    assert_eq!(engine.complete(&caller, "msg alice hel"), Vec::<String>::new());
}

#[tokio::test]
async fn test_exact_alias_without_trailing_space() {
    let (engine, _) = shop_engine(online());
    let caller: CallerRef = RecordingCaller::operator("op");

    assert_eq!(engine.complete(&caller, "give item"), Vec::<String>::new());
    assert_eq!(engine.complete(&caller, "teleport"), Vec::<String>::new());
    assert_eq!(engine.complete(&caller, "give ite"), vec!["item"]);
}

#[tokio::test]
async fn test_suggestions_extend_the_partial_word() {
    let (engine, _) = shop_engine(online());
    let caller: CallerRef = RecordingCaller::operator("op");

    for line in ["", "g", "give i", "sh", "shop ", "shop b", "tp a", "TP b", "msg ", "x"] {
        let partial = if line.ends_with(' ') {
            ""
        } else {
            line.rsplit(' ').next().unwrap_or_default()
        };
        let suggestions = engine.complete(&caller, line);

        for suggestion in &suggestions {
            assert!(
                suggestion.to_lowercase().starts_with(&partial.to_lowercase()),
                "{suggestion:?} does not extend {partial:?} (line {line:?})"
            );
        }
        let mut unique = suggestions.clone();
        unique.dedup();
        assert_eq!(unique.len(), suggestions.len(), "duplicates for {line:?}");
    }
}
