//! Shared fixtures for engine tests.

use std::sync::{Arc, Mutex};

use cmdroute::caller::{ActorDirectory, Caller, CallerRef};
use cmdroute::commands::{CommandDescriptor, ParamSpec};
use cmdroute::config::{Config, WorkerConfig};
use cmdroute::engine::{CommandEngine, EngineBuilder};
use cmdroute::types::{Kind, Value};
use cmdroute::worker::WorkerPool;

/// Caller that records every message it is sent.
pub struct RecordingCaller {
    name: String,
    interactive: bool,
    administrator: bool,
    capabilities: Vec<String>,
    messages: Mutex<Vec<String>>,
}

impl RecordingCaller {
    fn new(name: &str, interactive: bool, administrator: bool, capabilities: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            interactive,
            administrator,
            capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
            messages: Mutex::new(Vec::new()),
        })
    }

    pub fn user(name: &str, capabilities: &[&str]) -> Arc<Self> {
        Self::new(name, true, false, capabilities)
    }

    pub fn operator(name: &str) -> Arc<Self> {
        Self::new(name, true, true, &[])
    }

    pub fn console() -> Arc<Self> {
        Self::new("CONSOLE", false, false, &[])
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Caller for RecordingCaller {
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
        self.capabilities.iter().any(|c| c == capability)
    }

    fn send(&self, text: &str) {
        self.messages.lock().unwrap().push(text.to_string());
    }
}

/// Fixed set of online actors.
pub struct Online(pub Vec<CallerRef>);

impl ActorDirectory for Online {
    fn find_online(&self, name: &str) -> Option<CallerRef> {
        self.0
            .iter()
            .find(|actor| actor.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    fn online(&self) -> Vec<CallerRef> {
        self.0.clone()
    }
}

/// Every invocation seen by a recording behavior.
pub type Invocations = Arc<Mutex<Vec<Vec<Value>>>>;

pub fn record(
    invocations: &Invocations,
) -> impl Fn(&[Value]) -> anyhow::Result<()> + Send + Sync + 'static {
    let invocations = Arc::clone(invocations);
    move |args| {
        invocations.lock().unwrap().push(args.to_vec());
        Ok(())
    }
}

/// Builder with the built-in kinds installed and `online` as the directory.
pub fn builder(online: Vec<CallerRef>) -> EngineBuilder {
    let mut builder = EngineBuilder::from_config(&Config::default());
    builder.install_builtin_types(Arc::new(Online(online))).unwrap();
    builder
}

/// Engine with a small shop command table. Every command records into the
/// returned invocation log.
pub fn shop_engine(online: Vec<CallerRef>) -> (CommandEngine, Invocations) {
    let invocations = Invocations::default();
    let mut builder = builder(online);

    let table = [
        CommandDescriptor::builder("give item")
            .capability("shop.give")
            .param(ParamSpec::new("amount", Kind::INTEGER))
            .build(record(&invocations)),
        CommandDescriptor::builder("give money")
            .capability("shop.give")
            .param(ParamSpec::new("amount", Kind::DOUBLE))
            .build(record(&invocations)),
        CommandDescriptor::builder("shop")
            .param(ParamSpec::new("page", Kind::INTEGER).default_value("1"))
            .build(record(&invocations)),
        CommandDescriptor::builder("shop buy")
            .param(ParamSpec::new("item", Kind::STRING))
            .param(ParamSpec::new("amount", Kind::INTEGER).default_value("1"))
            .build(record(&invocations)),
        CommandDescriptor::builder("tp")
            .alias("teleport")
            .interactive_only()
            .param(ParamSpec::new("target", Kind::ACTOR))
            .build(record(&invocations)),
        CommandDescriptor::builder("msg")
            .param(ParamSpec::new("target", Kind::ACTOR))
            .param(ParamSpec::new("text", Kind::STRING).wildcard())
            .build(record(&invocations)),
    ];
    for descriptor in table {
        builder.register_command(descriptor).unwrap();
    }

    let engine = builder.start(WorkerPool::spawn(&WorkerConfig::default()));
    (engine, invocations)
}
