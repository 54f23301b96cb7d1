//! Command-line host.
//!
//! Each command wires an [`AppRuntime`] the same way a browser bridge would,
//! runs one use case and prints its result as JSON on stdout.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Map, Value};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::warn;
use ws_app::widgets::ResolveContext;
use ws_core::config::ShellConfig;
use ws_core::entity::ConfigStore;
use ws_core::widget::{base_key, RenderOutcome, WidgetDescriptor};
use ws_platform::{ChannelHost, HostEvent};

use super::config::{load_config, load_config_store, resolve_config_path};
use super::runtime::AppRuntime;
use super::tracing::init_tracing_subscriber;
use super::wiring::{wire_dependencies, HostPorts};

#[derive(Debug, Parser)]
#[command(name = "widget-shell")]
#[command(about = "Resolve widgets and browse entity tables against a REST backend")]
pub struct Cli {
    /// Shell configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve a widget key and print what it renders
    Resolve(ResolveArgs),
    /// Load one page of an entity table
    List(ListArgs),
    /// Validate and print the entity configs
    Configs {
        /// Print every config in full
        #[arg(long)]
        full: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProvenanceArg {
    Builtin,
    BuiltinReact,
    Uploaded,
    Fetched,
}

#[derive(Debug, clap::Args)]
pub struct ResolveArgs {
    /// Widget key, e.g. `contacts-widget` or `lead-profile-widget-35`
    pub key: String,

    #[arg(long, value_enum, default_value_t = ProvenanceArg::Builtin)]
    pub provenance: ProvenanceArg,

    /// Script or module URI for uploaded and fetched widgets
    #[arg(long)]
    pub path: Option<String>,

    /// Auxiliary data for builtin-react widgets (JSON object)
    #[arg(long)]
    pub widget_data: Option<String>,

    /// Props passed to the widget (JSON object)
    #[arg(long)]
    pub props: Option<String>,

    /// Payload for `search-result-*` widgets (JSON)
    #[arg(long)]
    pub search_result: Option<String>,
}

#[derive(Debug, clap::Args)]
pub struct ListArgs {
    /// Entity type, e.g. `contacts`
    pub entity: String,

    #[arg(long, default_value_t = 1)]
    pub page: u32,

    #[arg(long)]
    pub search: Option<String>,

    /// Filter as `key=value`; repeatable
    #[arg(long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("--path is required for {0} widgets")]
    MissingPath(&'static str),

    #[error("--{flag} is not valid JSON")]
    InvalidJson {
        flag: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("--{0} must be a JSON object")]
    NotAnObject(&'static str),
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got `{raw}`")),
    }
}

fn parse_json(flag: &'static str, raw: Option<&str>) -> Result<Option<Value>, CommandError> {
    raw.map(|raw| serde_json::from_str(raw).map_err(|source| CommandError::InvalidJson { flag, source }))
        .transpose()
}

fn parse_object(flag: &'static str, raw: Option<&str>) -> Result<Map<String, Value>, CommandError> {
    match parse_json(flag, raw)? {
        None => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(CommandError::NotAnObject(flag)),
    }
}

impl ResolveArgs {
    pub fn descriptor(&self) -> Result<WidgetDescriptor, CommandError> {
        let key = self.key.clone();
        let path = |label| self.path.clone().ok_or(CommandError::MissingPath(label));
        Ok(match self.provenance {
            ProvenanceArg::Builtin => WidgetDescriptor::builtin(key),
            ProvenanceArg::BuiltinReact => WidgetDescriptor::builtin_react(
                key,
                parse_object("widget-data", self.widget_data.as_deref())?,
            ),
            ProvenanceArg::Uploaded => WidgetDescriptor::uploaded(key, path("uploaded")?),
            ProvenanceArg::Fetched => WidgetDescriptor::fetched(key, path("fetched")?),
        })
    }

    pub fn context(&self) -> Result<ResolveContext, CommandError> {
        Ok(ResolveContext {
            props: parse_object("props", self.props.as_deref())?,
            search_result: parse_json("search-result", self.search_result.as_deref())?,
        })
    }
}

/// Entry point used by `main`: load configuration, start tracing, run the
/// command on a multi-threaded tokio runtime.
pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    let config_path = resolve_config_path(cli.config.as_deref());
    let config = load_config(config_path.as_deref())?;
    init_tracing_subscriber(&config.logging)?;
    tracing::debug!(config = ?config_path, "shell configuration loaded");

    let configs = load_config_store(&config, config_path.as_deref())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start tokio runtime")?;
    let output = runtime.block_on(execute(cli.command, config, configs))?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Run one command against a freshly wired runtime.
pub async fn execute(
    command: Command,
    config: ShellConfig,
    configs: ConfigStore,
) -> anyhow::Result<Value> {
    match command {
        Command::Resolve(args) => {
            let (host, events) = ChannelHost::new();
            let deps = wire_dependencies(&config, HostPorts::channel(host))?;
            let runtime = AppRuntime::new(deps, config, configs);
            let output = resolve_widget(&runtime, &args, events).await;
            runtime.shutdown();
            output
        }
        Command::List(args) => {
            let deps = wire_dependencies(&config, HostPorts::tracing())?;
            let runtime = AppRuntime::new(deps, config, configs);
            let output = list_entities(&runtime, &args).await;
            runtime.shutdown();
            output
        }
        Command::Configs { full } => Ok(describe_configs(&configs, full)),
    }
}

#[tracing::instrument(name = "command.resolve", skip_all, fields(key = %args.key))]
async fn resolve_widget(
    runtime: &AppRuntime,
    args: &ResolveArgs,
    mut events: UnboundedReceiver<HostEvent>,
) -> anyhow::Result<Value> {
    let descriptor = args.descriptor()?;
    let context = args.context()?;

    // Table widgets render their engine's last snapshot; load it first.
    let base = base_key(&descriptor.key);
    if let Some(table) = runtime
        .registry()
        .tables()
        .find(|table| table.engine().config().widget_key() == base)
    {
        if let Err(err) = table.engine().initialize().await {
            warn!(error = %err, "table data unavailable");
        }
        table.refresh().await;
    }

    let resolver = runtime.usecases().widget_resolver();
    let mut mount = resolver.mount(&descriptor, context);
    let outcome = mount.settled().await;

    // Let the ready signal fire before reporting.
    if outcome.is_registered() {
        tokio::time::sleep(resolver.settings().ready_delay + Duration::from_millis(10)).await;
    }
    let output = json!({
        "key": mount.key(),
        "provenance": descriptor.provenance.label(),
        "outcome": outcome_label(&outcome),
        "render": mount.render(),
        "signals": drain_signals(&mut events),
    });
    mount.unmount();
    Ok(output)
}

fn outcome_label(outcome: &RenderOutcome) -> &'static str {
    match outcome {
        RenderOutcome::Registered { .. } => "registered",
        RenderOutcome::Loading(_) => "loading",
        RenderOutcome::Error(_) => "error",
        RenderOutcome::Unknown(_) => "unknown",
    }
}

fn drain_signals(events: &mut UnboundedReceiver<HostEvent>) -> Vec<Value> {
    let mut signals = Vec::new();
    while let Ok(event) = events.try_recv() {
        signals.push(match event {
            HostEvent::Ready { widget_key } => json!({ "ready": widget_key }),
            HostEvent::Error {
                widget_key,
                message,
            } => json!({ "error": widget_key, "message": message }),
            HostEvent::OpenProfile { kind, id } => {
                json!({ "openProfile": kind, "id": id.to_string() })
            }
        });
    }
    signals
}

#[tracing::instrument(name = "command.list", skip_all, fields(entity = %args.entity))]
async fn list_entities(runtime: &AppRuntime, args: &ListArgs) -> anyhow::Result<Value> {
    let engine = runtime.usecases().entity_engine(&args.entity)?;
    engine.initialize().await?;

    for (key, value) in &args.filters {
        engine
            .set_filter(key, value)
            .await
            .with_context(|| format!("Failed to apply filter `{key}`"))?;
    }
    if let Some(term) = args.search.as_deref() {
        engine.apply_search(term).await?;
    }
    if args.page != engine.pagination().await.current_page {
        engine.go_to_page(args.page).await?;
    }

    Ok(engine.view().await.to_value())
}

fn describe_configs(configs: &ConfigStore, full: bool) -> Value {
    let entries = configs
        .iter()
        .map(|config| {
            if full {
                return serde_json::to_value(&**config).unwrap_or(Value::Null);
            }
            json!({
                "entityType": config.entity_type,
                "title": config.title,
                "endpoint": config.api_endpoint,
                "widgetKey": config.widget_key(),
                "profileWidgetKey": config.profile.as_ref().map(|profile| profile.widget_key()),
                "features": config.features,
                "itemsPerPage": config.items_per_page,
            })
        })
        .collect();
    Value::Array(entries)
}
