//! Subcommand implementations

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use host_services::HostConfig;
use node_engine::{
    deserialize_app, lint_app, serialize_app, AppStore, HostServices, MiniApp, NodeEngineError,
    NodeRegistry, Result, Runtime,
};

use crate::cli::{Cli, Command};
use crate::console::ConsoleCallbacks;
use crate::paths;

/// Resolved configuration for one invocation
pub struct Context {
    pub config: HostConfig,
    pub data_dir: PathBuf,
}

impl Context {
    pub fn load(cli: &Cli) -> Result<Self> {
        let data_dir = cli.data_dir.clone().unwrap_or_else(paths::default_data_dir);
        let mut config = match &cli.config {
            // An explicit path must exist
            Some(path) => HostConfig::load(path)?,
            None => match paths::default_config_path() {
                Some(path) => HostConfig::load_or_default(&path)?,
                None => HostConfig::default(),
            },
        };
        if config.store_path.is_none() {
            config.store_path = Some(paths::store_file(&data_dir));
        }
        Ok(Self { config, data_dir })
    }

    fn open_store(&self) -> Result<AppStore> {
        let mut store = AppStore::with_persistence(paths::apps_dir(&self.data_dir));
        let count = store.load_from_disk()?;
        log::debug!("Loaded {} apps from {:?}", count, self.data_dir);
        Ok(store)
    }
}

/// What to do with a started app before stopping it
#[derive(Debug, Default, Clone)]
pub struct RunScript {
    pub inputs: Vec<(String, String)>,
    pub clicks: Vec<String>,
    pub keys: Vec<String>,
    pub duration: Duration,
}

pub async fn run(cli: Cli) -> Result<()> {
    let ctx = Context::load(&cli)?;
    match cli.command {
        Command::Run {
            app,
            duration_ms,
            clicks,
            keys,
            inputs,
        } => {
            let script = RunScript {
                inputs,
                clicks,
                keys,
                duration: Duration::from_millis(duration_ms),
            };
            run_app(&ctx, &app, &script).await
        }
        Command::Validate { file, strict } => validate(&file, strict),
        Command::New { name } => {
            let id = ctx.open_store()?.save(MiniApp::create_empty(name))?;
            println!("{}", id);
            Ok(())
        }
        Command::List => list(&ctx),
        Command::Import { file } => {
            let json = std::fs::read_to_string(&file)?;
            let id = ctx.open_store()?.import(&json)?;
            println!("Imported {}", id);
            Ok(())
        }
        Command::Export { id } => {
            println!("{}", ctx.open_store()?.export(&id)?);
            Ok(())
        }
        Command::Delete { id } => {
            let app = ctx.open_store()?.delete(&id)?;
            println!("Deleted {} ({})", app.id, app.name);
            Ok(())
        }
        Command::Catalog { json } => catalog(&app_nodes::builtin_registry(), json),
    }
}

/// A path on disk, or else an id in the library
fn load_app(ctx: &Context, app_ref: &str) -> Result<MiniApp> {
    let path = Path::new(app_ref);
    if path.exists() {
        return deserialize_app(&std::fs::read_to_string(path)?);
    }
    Ok(ctx.open_store()?.get(app_ref)?.clone())
}

fn report_issues(app: &MiniApp, registry: &NodeRegistry) -> usize {
    let issues = lint_app(app, Some(registry));
    for issue in &issues {
        log::warn!("{}", issue);
    }
    issues.len()
}

async fn run_app(ctx: &Context, app_ref: &str, script: &RunScript) -> Result<()> {
    let app = load_app(ctx, app_ref)?;
    let registry = Arc::new(app_nodes::builtin_registry());
    report_issues(&app, &registry);

    let services = ctx.config.build_services()?;
    let console = ConsoleCallbacks::new();
    log::info!("Running '{}' ({})", app.name, app.id);
    let runtime = drive(&app, registry, services, console.clone(), script).await;

    let ui = console.ui().snapshot();
    println!("--- {} ---", ui.current_page);
    for component in ui.visible_components(&app) {
        if let Some(text) = ui.effective_text(component) {
            println!("{:<24} {}", component.id, text);
        }
    }
    let mut variables: Vec<_> = runtime.variables().into_iter().collect();
    variables.sort_by(|a, b| a.0.cmp(&b.0));
    for (name, value) in variables {
        println!("${} = {}", name, value);
    }
    Ok(())
}

/// Start the app, replay the script, wait, then stop
pub async fn drive(
    app: &MiniApp,
    registry: Arc<NodeRegistry>,
    services: HostServices,
    console: ConsoleCallbacks,
    script: &RunScript,
) -> Runtime {
    {
        let state = console.ui().state();
        let mut state = state.lock();
        for (id, value) in &script.inputs {
            state.set_input_value(id, value);
        }
    }

    let runtime = Runtime::new(app, Arc::new(console), services).with_registry(registry);
    runtime.start().await;
    for id in &script.clicks {
        runtime.handle_event("click", id).await;
    }
    for key in &script.keys {
        runtime.handle_key_press(key).await;
    }

    if !script.duration.is_zero() {
        tokio::select! {
            _ = tokio::time::sleep(script.duration) => {}
            _ = tokio::signal::ctrl_c() => log::info!("Interrupted"),
        }
    }
    runtime.stop();
    runtime
}

fn validate(file: &Path, strict: bool) -> Result<()> {
    let app = deserialize_app(&std::fs::read_to_string(file)?)?;
    let registry = app_nodes::builtin_registry();
    let issues = report_issues(&app, &registry);
    println!(
        "{}: {} components, {} nodes, {} connections, {} issue(s)",
        app.name,
        app.ui_components.len(),
        app.nodes.len(),
        app.connections.len(),
        issues
    );
    if strict && issues > 0 {
        return Err(NodeEngineError::invalid_format(format!(
            "{} lint issue(s) in {:?}",
            issues, file
        )));
    }
    Ok(())
}

fn list(ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    for summary in store.list() {
        println!(
            "{:<20} {:<24} v{:<6} {:>3} ui {:>3} nodes  {}",
            summary.id,
            summary.name,
            summary.version,
            summary.ui_count,
            summary.node_count,
            summary.updated_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

fn catalog(registry: &NodeRegistry, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&registry.all())?);
        return Ok(());
    }
    for (category, defs) in registry.list_by_category() {
        println!("{} {}", category.icon(), category.label());
        for def in defs {
            println!("  {:<20} {}", def.id, def.label);
        }
    }
    Ok(())
}
