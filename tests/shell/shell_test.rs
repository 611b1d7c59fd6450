//! Integration tests for the demo shell binary.

use super::common::run_shell;

#[test]
fn test_console_runs_commands() {
    let (code, stdout, _) = run_shell(&[], "/say hello there\nshop buy apple 3\n");

    assert_eq!(code, 0);
    assert!(stdout.contains("<CONSOLE> hello there"), "Got: {stdout}");
    assert!(stdout.contains("Bought 3 x apple."), "Got: {stdout}");
}

#[test]
fn test_console_cannot_fly() {
    let (code, stdout, _) = run_shell(&[], "fly\n");

    assert_eq!(code, 0);
    assert!(
        stdout.contains("This command does not support execution from the console."),
        "Got: {stdout}"
    );
}

#[test]
fn test_user_without_capability() {
    let (code, stdout, _) = run_shell(&["--as-user", "dana"], "give item 5\n");

    assert_eq!(code, 0);
    assert!(
        stdout.contains("You do not have permission to execute this command."),
        "Got: {stdout}"
    );
}

#[test]
fn test_user_with_grant() {
    let (code, stdout, _) = run_shell(
        &["--as-user", "dana", "--grant", "shop.give"],
        "give item 5 alice\n",
    );

    assert_eq!(code, 0);
    assert!(stdout.contains("Gave 5 item(s) to Alice."), "Got: {stdout}");
}

#[test]
fn test_completion_line() {
    let (code, stdout, _) = run_shell(&["--as-user", "dana", "--op"], "?tp \n?tp al\n?zzz\n");

    assert_eq!(code, 0);
    assert!(stdout.contains("Alice  alfred  bob  dana"), "Got: {stdout}");
    assert!(stdout.contains("(no suggestions)"), "Got: {stdout}");
}

#[test]
fn test_unknown_subcommand_listing() {
    let (code, stdout, _) = run_shell(&[], "shop steal\n");

    assert_eq!(code, 0);
    assert!(stdout.contains("Unknown sub-command. Available commands:"), "Got: {stdout}");
    assert!(stdout.contains("- /shop buy <item> [amount]"), "Got: {stdout}");
    assert!(stdout.contains("- /shop sell <item>"), "Got: {stdout}");
}

#[test]
fn test_console_stop_ends_session() {
    let (code, stdout, _) = run_shell(&[], "stop\nsay too late\n");

    assert_eq!(code, 0);
    assert!(!stdout.contains("too late"), "Got: {stdout}");
}

#[test]
fn test_user_stop_is_ordinary_command() {
    let (code, stdout, _) = run_shell(&["--as-user", "dana", "--op"], "stop\nsay still here\n");

    assert_eq!(code, 0);
    assert!(stdout.contains("Only the console can stop the shell."), "Got: {stdout}");
    assert!(stdout.contains("<dana> still here"), "Got: {stdout}");
}
