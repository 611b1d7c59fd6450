//! Demo front-end: a local caller, a fixed roster of online actors and a
//! small command table wired into the engine.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use cmdroute::caller::{ActorDirectory, Caller, CallerRef};
use cmdroute::commands::{CommandDescriptor, DispatchOutcome, ParamSpec};
use cmdroute::engine::{CommandEngine, EngineBuilder};
use cmdroute::error::Result;
use cmdroute::types::{Kind, Value};

/// Whoever is typing into the shell.
#[derive(Debug)]
pub struct LocalCaller {
    name: String,
    interactive: bool,
    administrator: bool,
    capabilities: HashSet<String>,
}

impl LocalCaller {
    pub fn console() -> Self {
        Self {
            name: "CONSOLE".to_string(),
            interactive: false,
            administrator: false,
            capabilities: HashSet::new(),
        }
    }

    pub fn user(name: impl Into<String>, administrator: bool, capabilities: &[String]) -> Self {
        Self {
            name: name.into(),
            interactive: true,
            administrator,
            capabilities: capabilities.iter().cloned().collect(),
        }
    }
}

impl Caller for LocalCaller {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn is_administrator(&self) -> bool {
        self.administrator
    }

    fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }

    fn send(&self, text: &str) {
        println!("{text}");
    }
}

/// Simulated remote user. Messages sent to it only show up in the log.
#[derive(Debug)]
struct RemoteUser {
    name: String,
}

impl Caller for RemoteUser {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_interactive(&self) -> bool {
        true
    }

    fn is_administrator(&self) -> bool {
        false
    }

    fn has_capability(&self, _capability: &str) -> bool {
        false
    }

    fn send(&self, text: &str) {
        info!(to = %self.name, "{text}");
    }
}

/// Online actors: the local user (if any) plus a few simulated ones.
pub struct Roster {
    online: Vec<CallerRef>,
}

impl Roster {
    pub fn new(local: &CallerRef) -> Self {
        let mut online: Vec<CallerRef> = ["Alice", "alfred", "bob"]
            .into_iter()
            .map(|name| Arc::new(RemoteUser { name: name.to_string() }) as CallerRef)
            .collect();
        if local.is_interactive() {
            online.push(Arc::clone(local));
        }
        Self { online }
    }
}

impl ActorDirectory for Roster {
    fn find_online(&self, name: &str) -> Option<CallerRef> {
        self.online
            .iter()
            .find(|actor| actor.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    fn online(&self) -> Vec<CallerRef> {
        self.online.clone()
    }
}

fn caller_arg(args: &[Value]) -> anyhow::Result<&CallerRef> {
    args.first()
        .and_then(Value::as_caller)
        .context("behavior called without a caller")
}

fn arg<'v, T>(args: &'v [Value], index: usize, read: impl Fn(&'v Value) -> Option<T>) -> anyhow::Result<T> {
    args.get(index)
        .and_then(read)
        .with_context(|| format!("argument {index} missing or of the wrong kind"))
}

/// Registers the demo command table.
pub fn register_demo_commands(builder: &mut EngineBuilder) -> Result<()> {
    builder.register_command(
        CommandDescriptor::builder("give item")
            .alias("gi")
            .capability("shop.give")
            .param(ParamSpec::new("amount", Kind::INTEGER))
            .param(ParamSpec::new("target", Kind::ACTOR).default_value("self"))
            .build(|args| {
                let caller = caller_arg(args)?;
                let amount = arg(args, 1, Value::as_int)?;
                let target = arg(args, 2, Value::as_actor)?;
                target.send(&format!("{} gave you {amount} item(s).", caller.name()));
                caller.send(&format!("Gave {amount} item(s) to {}.", target.name()));
                Ok(())
            }),
    )?;

    builder.register_command(
        CommandDescriptor::builder("give money")
            .capability("shop.give")
            .param(ParamSpec::new("amount", Kind::DOUBLE))
            .param(ParamSpec::new("target", Kind::ACTOR).default_value("self"))
            .build(|args| {
                let caller = caller_arg(args)?;
                let amount = arg(args, 1, Value::as_double)?;
                let target = arg(args, 2, Value::as_actor)?;
                caller.send(&format!("Paid {amount:.2} to {}.", target.name()));
                Ok(())
            }),
    )?;

    builder.register_command(
        CommandDescriptor::builder("shop buy")
            .alias("buy")
            .capability("shop.use")
            .param(ParamSpec::new("item", Kind::STRING))
            .param(ParamSpec::new("amount", Kind::INTEGER).default_value("1"))
            .build(|args| {
                let caller = caller_arg(args)?;
                let item = arg(args, 1, Value::as_str)?;
                let amount = arg(args, 2, Value::as_int)?;
                caller.send(&format!("Bought {amount} x {item}."));
                Ok(())
            }),
    )?;

    builder.register_command(
        CommandDescriptor::builder("shop sell")
            .capability("shop.sell")
            .param(ParamSpec::new("item", Kind::STRING))
            .build(|args| {
                let caller = caller_arg(args)?;
                let item = arg(args, 1, Value::as_str)?;
                anyhow::ensure!(item != "cursed", "refusing to buy back a cursed item");
                caller.send(&format!("Sold {item}."));
                Ok(())
            }),
    )?;

    builder.register_command(
        CommandDescriptor::builder("teleport")
            .alias("tp")
            .capability("travel.teleport")
            .interactive_only()
            .param(ParamSpec::new("target", Kind::ACTOR))
            .build(|args| {
                let caller = caller_arg(args)?;
                let target = arg(args, 1, Value::as_actor)?;
                caller.send(&format!("Teleported to {}.", target.name()));
                Ok(())
            }),
    )?;

    builder.register_command(
        CommandDescriptor::builder("fly")
            .interactive_only()
            .param(ParamSpec::new("enabled", Kind::BOOLEAN).default_value("on"))
            .build(|args| {
                let caller = caller_arg(args)?;
                let enabled = arg(args, 1, Value::as_bool)?;
                caller.send(if enabled { "Flight enabled." } else { "Flight disabled." });
                Ok(())
            }),
    )?;

    builder.register_command(
        CommandDescriptor::builder("say")
            .param(ParamSpec::new("message", Kind::STRING).wildcard())
            .build(|args| {
                let caller = caller_arg(args)?;
                let message = arg(args, 1, Value::as_str)?;
                caller.send(&format!("<{}> {message}", caller.name()));
                Ok(())
            }),
    )?;

    builder.register_command(
        CommandDescriptor::builder("backup")
            .capability("server.backup")
            .run_async()
            .param(ParamSpec::new("delay", Kind::FLOAT).default_value("0.5"))
            .build(|args| {
                let caller = caller_arg(args)?;
                let delay = arg(args, 1, Value::as_float)?;
                anyhow::ensure!(delay >= 0.0, "negative backup delay");
                std::thread::sleep(std::time::Duration::from_secs_f32(delay));
                caller.send("Backup complete.");
                Ok(())
            }),
    )?;

    builder.register_command(
        CommandDescriptor::builder("stop")
            .capability("server.stop")
            .build(|args| {
                let caller = caller_arg(args)?;
                caller.send("Only the console can stop the shell.");
                Ok(())
            }),
    )?;

    Ok(())
}

/// What the shell did with one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Blank input.
    Nothing,
    /// Completion candidates for a `?` line.
    Completions(Vec<String>),
    /// The line was dispatched.
    Dispatched(DispatchOutcome),
}

/// Handles one input line.
pub fn handle_line(engine: &CommandEngine, caller: &CallerRef, line: &str) -> Reply {
    if let Some(partial) = line.strip_prefix('?') {
        return Reply::Completions(engine.complete(caller, partial));
    }

    let line = line.trim();
    let line = line.strip_prefix('/').unwrap_or(line);
    let mut words = line.split_whitespace();
    let Some(label) = words.next() else {
        return Reply::Nothing;
    };
    let args: Vec<&str> = words.collect();

    Reply::Dispatched(engine.dispatch_root(caller, label, &args))
}
