//! cmdroute - interactive shell over the command routing engine.

mod cli;
mod shell;

use std::sync::Arc;

use cli::Cli;
use cmdroute::caller::CallerRef;
use cmdroute::commands::ShutdownGate;
use cmdroute::config::Config;
use cmdroute::engine::EngineBuilder;
use cmdroute::error::Result;
use cmdroute::logging;
use cmdroute::worker::WorkerPool;
use shell::{handle_line, LocalCaller, Reply, Roster};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    match &cli.log_file {
        Some(Some(path)) => logging::init_file_logging(path),
        Some(None) => logging::init_file_logging(&logging::get_log_path()),
        None => logging::init_stderr_logging(),
    }

    if let Err(e) = run(cli).await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let caller: CallerRef = match &cli.as_user {
        Some(name) => Arc::new(LocalCaller::user(name, cli.op, &cli.grant)),
        None => Arc::new(LocalCaller::console()),
    };

    let stop = CancellationToken::new();
    let mut builder = EngineBuilder::from_config(&config);
    builder.install_builtin_types(Arc::new(Roster::new(&caller)))?;
    shell::register_demo_commands(&mut builder)?;
    builder.shutdown_gate({
        let stop = stop.clone();
        ShutdownGate::new(config.engine.shutdown_command.clone(), move |caller| {
            info!(caller = caller.name(), "Stopping shell");
            stop.cancel();
        })
    });

    let engine = builder.start(WorkerPool::spawn(&config.workers));
    let mut lines = spawn_stdin_reader();

    loop {
        let line = tokio::select! {
            biased;
            _ = stop.cancelled() => break,
            line = lines.recv() => match line {
                Some(line) => line,
                None => break,
            },
        };

        match handle_line(&engine, &caller, &line) {
            Reply::Nothing => {}
            Reply::Completions(candidates) if candidates.is_empty() => {
                println!("(no suggestions)");
            }
            Reply::Completions(candidates) => println!("{}", candidates.join("  ")),
            Reply::Dispatched(outcome) if !outcome.is_found() => {
                println!("Unknown command. Type ? to list commands.");
            }
            Reply::Dispatched(_) => {}
        }
    }

    engine.close().await
}

/// Reads stdin on a detached thread so a pending read never holds up exit.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read input: {e}");
                    break;
                }
            }
        }
    });
    rx
}
