//! Integration tests for line dispatch.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use cmdroute::caller::CallerRef;
use cmdroute::commands::{CommandDescriptor, DispatchOutcome, ParamSpec, RejectReason, ShutdownGate};
use cmdroute::config::{MessagesConfig, WorkerConfig};
use cmdroute::types::{Kind, Value};
use cmdroute::worker::WorkerPool;
use pretty_assertions::assert_eq;
use tokio::sync::oneshot;
use tokio::time::timeout;

use super::common::{builder, record, shop_engine, Invocations, RecordingCaller};

#[tokio::test]
async fn test_user_without_capability_is_rejected() {
    let (engine, invocations) = shop_engine(vec![]);
    let bob = RecordingCaller::user("bob", &["commands.default"]);
    let caller: CallerRef = bob.clone();

    let outcome = engine.dispatch_line(&caller, "give item 5");

    assert_eq!(outcome, DispatchOutcome::Rejected(RejectReason::NoPermission));
    assert_eq!(bob.messages(), vec![MessagesConfig::default().no_permission]);
    assert!(invocations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_user_with_capability_is_invoked() {
    let (engine, invocations) = shop_engine(vec![]);
    let caller: CallerRef = RecordingCaller::user("alice", &["shop.give"]);

    let outcome = engine.dispatch_line(&caller, "give item 5");

    assert_eq!(outcome, DispatchOutcome::Invoked);
    assert_eq!(
        *invocations.lock().unwrap(),
        vec![vec![Value::Caller(caller.clone()), Value::Int(5)]]
    );
}

#[tokio::test]
async fn test_default_capability_applies_to_undeclared_commands() {
    let (engine, _) = shop_engine(vec![]);
    let carol = RecordingCaller::user("carol", &[]);
    let caller: CallerRef = carol.clone();

    assert_eq!(
        engine.dispatch_line(&caller, "shop"),
        DispatchOutcome::Rejected(RejectReason::NoPermission)
    );

    let dave: CallerRef = RecordingCaller::user("dave", &["commands.default"]);
    assert_eq!(engine.dispatch_line(&dave, "shop"), DispatchOutcome::Invoked);
}

#[tokio::test]
async fn test_console_rejected_from_interactive_only_command() {
    let (engine, invocations) = shop_engine(vec![]);
    let console = RecordingCaller::console();
    let caller: CallerRef = console.clone();

    let outcome = engine.dispatch_line(&caller, "teleport alice");

    assert_eq!(outcome, DispatchOutcome::Rejected(RejectReason::ConsoleNotAllowed));
    assert_eq!(console.messages(), vec![MessagesConfig::default().console_not_allowed]);
    assert!(invocations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_longest_alias_and_defaults() {
    let (engine, invocations) = shop_engine(vec![]);
    let caller: CallerRef = RecordingCaller::operator("op");

    assert_eq!(engine.dispatch_line(&caller, "Shop Buy sword"), DispatchOutcome::Invoked);
    assert_eq!(engine.dispatch_line(&caller, "shop 3"), DispatchOutcome::Invoked);

    let invocations = invocations.lock().unwrap();
    assert_eq!(
        invocations[0][1..],
        [Value::Str("sword".to_string()), Value::Int(1)]
    );
    assert_eq!(invocations[1][1..], [Value::Int(3)]);
}

#[tokio::test]
async fn test_actor_and_wildcard_binding() {
    let alice: CallerRef = RecordingCaller::user("Alice", &[]);
    let (engine, invocations) = shop_engine(vec![alice.clone()]);
    let console: CallerRef = RecordingCaller::console();

    assert_eq!(
        engine.dispatch_line(&console, "msg alice see you   at noon"),
        DispatchOutcome::Invoked
    );

    let invocations = invocations.lock().unwrap();
    assert_eq!(
        invocations[0],
        vec![
            Value::Caller(console.clone()),
            Value::Actor(alice.clone()),
            Value::Str("see you at noon".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_offline_actor_rejected() {
    let (engine, invocations) = shop_engine(vec![]);
    let console = RecordingCaller::console();
    let caller: CallerRef = console.clone();

    assert_eq!(
        engine.dispatch_line(&caller, "msg nobody hi"),
        DispatchOutcome::Rejected(RejectReason::BindingFailed)
    );
    assert_eq!(console.messages(), vec!["That player is not online."]);
    assert!(invocations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_parameter_reports_usage_of_typed_alias() {
    let (engine, _) = shop_engine(vec![]);
    let op = RecordingCaller::operator("op");
    let caller: CallerRef = op.clone();

    assert_eq!(
        engine.dispatch_line(&caller, "TELEPORT"),
        DispatchOutcome::Rejected(RejectReason::BindingFailed)
    );
    assert_eq!(op.messages(), vec!["Usage: /teleport <target>"]);
}

#[tokio::test]
async fn test_unknown_line_is_not_found() {
    let (engine, _) = shop_engine(vec![]);
    let op = RecordingCaller::operator("op");
    let caller: CallerRef = op.clone();

    assert_eq!(engine.dispatch_line(&caller, "dance"), DispatchOutcome::NotFound);
    assert_eq!(engine.dispatch_line(&caller, "shopping"), DispatchOutcome::NotFound);
    assert!(op.messages().is_empty());
}

#[tokio::test]
async fn test_dispatch_root_lists_accessible_subcommands() {
    let invocations = Invocations::default();
    let mut builder = builder(vec![]);
    builder
        .register_command(
            CommandDescriptor::builder("warp set")
                .capability("warp.admin")
                .param(ParamSpec::new("name", Kind::STRING))
                .build(record(&invocations)),
        )
        .unwrap();
    builder
        .register_command(
            CommandDescriptor::builder("warp go")
                .capability("warp.use")
                .param(ParamSpec::new("name", Kind::STRING))
                .build(record(&invocations)),
        )
        .unwrap();
    let engine = builder.start(WorkerPool::spawn(&WorkerConfig::default()));
    let eve = RecordingCaller::user("eve", &["warp.use"]);
    let caller: CallerRef = eve.clone();

    assert_eq!(
        engine.dispatch_root(&caller, "warp", &["list"]),
        DispatchOutcome::NotFound
    );
    assert_eq!(
        eve.messages(),
        vec![
            MessagesConfig::default().unknown_subcommand,
            "- /warp go <name>".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_async_command_runs_in_background() {
    let (tx, rx) = oneshot::channel();
    let tx = Mutex::new(Some(tx));
    let mut builder = builder(vec![]);
    builder
        .register_command(
            CommandDescriptor::builder("backup")
                .run_async()
                .param(ParamSpec::new("label", Kind::STRING).default_value("nightly"))
                .build(move |args| {
                    if let Some(tx) = tx.lock().unwrap().take() {
                        let label = args[1].as_str().unwrap_or_default().to_string();
                        let _ = tx.send((label, std::thread::current().id()));
                    }
                    Ok(())
                }),
        )
        .unwrap();
    let engine = builder.start(WorkerPool::spawn(&WorkerConfig { max_concurrent: 2 }));
    let caller: CallerRef = RecordingCaller::console();

    assert_eq!(engine.dispatch_line(&caller, "backup"), DispatchOutcome::Invoked);

    let (label, thread) = timeout(Duration::from_secs(2), rx).await.unwrap().unwrap();
    assert_eq!(label, "nightly");
    assert_ne!(thread, std::thread::current().id());
    engine.close().await.unwrap();
}

#[tokio::test]
async fn test_failing_behavior_sends_generic_message() {
    let mut builder = builder(vec![]);
    builder
        .register_command(
            CommandDescriptor::builder("explode").build(|_| anyhow::bail!("boom")),
        )
        .unwrap();
    let engine = builder.start(WorkerPool::spawn(&WorkerConfig::default()));
    let console = RecordingCaller::console();
    let caller: CallerRef = console.clone();

    assert_eq!(engine.dispatch_line(&caller, "explode"), DispatchOutcome::Invoked);
    assert_eq!(console.messages(), vec![MessagesConfig::default().generic_failure]);
}

#[tokio::test]
async fn test_shutdown_gate_intercepts_console_stop() {
    let invocations = Invocations::default();
    let stopped_by = Arc::new(Mutex::new(None));
    let mut builder = builder(vec![]);
    builder
        .register_command(
            CommandDescriptor::builder("stop")
                .capability("server.stop")
                .build(record(&invocations)),
        )
        .unwrap();
    builder.shutdown_gate({
        let stopped_by = Arc::clone(&stopped_by);
        ShutdownGate::new("stop", move |caller: &CallerRef| {
            *stopped_by.lock().unwrap() = Some(caller.name().to_string());
        })
    });
    let engine = builder.start(WorkerPool::spawn(&WorkerConfig::default()));

    let user: CallerRef = RecordingCaller::user("mallory", &[]);
    assert_eq!(
        engine.dispatch_line(&user, "stop"),
        DispatchOutcome::Rejected(RejectReason::NoPermission)
    );
    assert!(stopped_by.lock().unwrap().is_none());

    let console: CallerRef = RecordingCaller::console();
    assert_eq!(engine.dispatch_line(&console, "STOP now"), DispatchOutcome::Invoked);
    assert_eq!(stopped_by.lock().unwrap().as_deref(), Some("CONSOLE"));
    assert!(invocations.lock().unwrap().is_empty());
}
