//! CLI command implementations
//!
//! All wiring lives here: main.rs only dispatches. The bus is
//! in-process; `serve` exists to exercise the backend under external
//! tooling and parks until interrupted.

use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};
use tokio::runtime::Runtime;

use crate::client::{ActionDispatcher, ClientSession, DispatchOutcome, RecordingRouter};
use crate::config::Config;
use crate::definition::{DefinitionLoader, DefinitionRegistry, ViewName};
use crate::observability::{Logger, MetricsRegistry};
use crate::runtime::{render_view, Scope};
use crate::server::{seed, Backend};
use crate::store::{FileKeyedStore, KeyedStore, MemoryKeyedStore, RecordStore};
use crate::transport::{MemoryBus, Transport};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Parses arguments and runs the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Runs one CLI command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Serve { config } => serve(&config),
        Command::Seed { config } => seed_store(&config),
        Command::Demo { config } => demo(&config),
    }
}

fn build_store(config: &Config) -> RecordStore {
    let keyed: Arc<dyn KeyedStore> = match &config.data_dir {
        Some(dir) => Arc::new(FileKeyedStore::new(dir)),
        None => Arc::new(MemoryKeyedStore::new()),
    };
    RecordStore::new(keyed)
}

/// Loads the definition registry: files first, then built-ins for any
/// shipped module the directory does not cover
fn build_registry(config: &Config) -> CliResult<DefinitionRegistry> {
    let mut registry = DefinitionLoader::new(&config.definitions_dir).load_all()?;
    for (module, raw) in seed::builtin_definitions() {
        if registry.get(module).is_none() {
            registry.register_raw(module, &raw)?;
        }
    }
    Ok(registry)
}

fn boot(config: &Config) -> CliResult<(Arc<MemoryBus>, RecordStore, Arc<MetricsRegistry>)> {
    let timeout = std::time::Duration::from_millis(config.request_timeout_ms);
    let bus = Arc::new(MemoryBus::with_timeout(timeout));
    let store = build_store(config);
    let registry = Arc::new(build_registry(config)?);
    let metrics = Arc::new(MetricsRegistry::new());

    if config.seed {
        let written = seed::apply_seed(&store)?;
        Logger::info("seed.applied", &[("records", &written.to_string())]);
    }

    let backend = Backend::new(bus.clone(), store.clone(), registry, metrics.clone());
    backend.start()?;
    Ok((bus, store, metrics))
}

fn serve(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let runtime = Runtime::new().map_err(|e| CliError::Runtime(e.to_string()))?;
    runtime.block_on(async {
        let (_bus, _store, _metrics) = boot(&config)?;
        Logger::info("serve.parked", &[]);
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| CliError::Runtime(e.to_string()))?;
        Logger::info("serve.stopped", &[]);
        Ok(())
    })
}

fn seed_store(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let store = build_store(&config);
    let written = seed::apply_seed(&store)?;
    for (module, raw) in seed::builtin_definitions() {
        store.put_definition(module, &raw)?;
    }
    Logger::info("seed.applied", &[("records", &written.to_string())]);
    Ok(())
}

fn demo(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let runtime = Runtime::new().map_err(|e| CliError::Runtime(e.to_string()))?;
    runtime.block_on(run_demo(&config))
}

/// The scripted walk-through: load definition and data, render the
/// list, acknowledge through the interpreted detail view, update over
/// the wire, observe both notifications, verify the final state.
async fn run_demo(config: &Config) -> CliResult<()> {
    let (bus, _store, _metrics) = boot(config)?;

    // A definition for an unknown module is an explicit error payload.
    let miss = bus
        .request("definitions.get.nonexistent", Value::Null)
        .await?;
    println!("definitions.get.nonexistent -> {}", miss);

    let mut session = ClientSession::new(bus.clone() as Arc<dyn Transport>, "incidents");
    session.load_definition().await?;
    session.load_records().await?;
    let mut updates = session.subscribe_updates()?;

    println!("incidents ({}):", session.state.records().len());
    let state_value = session.state.to_value();
    let definition = session
        .state
        .definition()
        .cloned()
        .ok_or_else(|| CliError::Runtime("definition missing after load".into()))?;
    let list = render_view(definition.view(ViewName::List), &Scope::of_state(&state_value));
    for node in &list {
        for row in &node.children {
            let cells: Vec<String> = row
                .children
                .iter()
                .map(|cell| cell.value.as_ref().map(value_text).unwrap_or_default())
                .collect();
            println!("  {}", cells.join(" | "));
        }
    }

    // Acknowledge INC-001 by dispatching the rendered detail button.
    session.state.show_detail("INC-001");
    let record = session
        .state
        .current()
        .map(|r| r.to_value())
        .ok_or_else(|| CliError::Runtime("INC-001 not in seed data".into()))?;
    let state_value = session.state.to_value();
    let detail = render_view(
        definition.view(ViewName::Detail),
        &Scope::with_record(&state_value, &record),
    );
    let acknowledge = detail
        .iter()
        .find(|node| node.label.as_deref() == Some("Acknowledge"))
        .and_then(|node| node.action.clone())
        .ok_or_else(|| CliError::Runtime("no Acknowledge button in detail view".into()))?;

    let mut router = RecordingRouter::default();
    let outcome = ActionDispatcher::new(bus.clone(), &mut session.state, &mut router)
        .dispatch(&acknowledge, Some(&record))
        .await;
    println!("acknowledge INC-001 -> {:?}", outcome);
    if outcome != DispatchOutcome::Completed {
        return Err(CliError::Runtime(format!("acknowledge failed: {:?}", outcome)));
    }

    // Update INC-002 over the wire, the way an external client would.
    let reply = bus
        .request(
            "commands.incidents.update",
            json!({"id": "INC-002", "updates": {"status": "resolved", "description": "fixed"}}),
        )
        .await?;
    println!("update INC-002 -> {}", reply);

    // Both notifications arrive on the push channel and merge by id.
    for _ in 0..2 {
        match updates.recv().await {
            Some(envelope) => {
                println!(
                    "notified: {} -> {}",
                    envelope.payload["id"], envelope.payload["status"]
                );
                session.apply_notification(&envelope);
            }
            None => return Err(CliError::Runtime("update channel closed".into())),
        }
    }

    // Re-query and verify the merged records by id.
    session.state.bump_generation();
    session.load_records().await?;
    for record in session.state.records() {
        println!(
            "  {}: {} (updatedAt: {})",
            record.id(),
            record.get("status").map(value_text).unwrap_or_default(),
            record.updated_at().unwrap_or("-")
        );
    }

    Ok(())
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
