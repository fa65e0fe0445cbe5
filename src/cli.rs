//! Command-line surface of the `classroll` binary.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use crate::api::{PageRequest, ResourceApi};
use crate::app::AppStores;
use crate::config::{Config, ConfigError};
use crate::entity::{Entity, EntityId};
use crate::server::ResourceServer;
use crate::store::EntityStore;

#[derive(Debug, Parser)]
#[command(name = "classroll", version, about = "Client and reference server for the class roll REST API")]
pub struct Cli {
    /// Path to the config file (default: ~/.config/classroll/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override api.base_url from the config file
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the in-memory reference server
    Serve {
        /// Override server.bind_addr (host:port)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Manage class entities
    ClassEntities {
        #[command(subcommand)]
        action: EntityAction,
    },
    /// Manage students
    Students {
        #[command(subcommand)]
        action: EntityAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum EntityAction {
    /// List one page of records
    List {
        #[arg(long, default_value_t = 0)]
        page: u32,
        /// Page size (default: store.default_page_size)
        #[arg(long)]
        size: Option<u32>,
        /// Sort as FIELD,asc or FIELD,desc
        #[arg(long)]
        sort: Option<String>,
    },
    /// Show one record
    Get { id: EntityId },
    /// Create a record from JSON (without id)
    Create { json: String },
    /// Replace a record from JSON (with id)
    Update { json: String },
    /// Update only the fields present in the JSON (with id)
    Patch { json: String },
    /// Delete a record
    Delete { id: EntityId },
}

impl Cli {
    /// Load the config file and apply command-line overrides.
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        if let Some(base_url) = &self.base_url {
            config.api.base_url = base_url.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

/// Execute a parsed command line.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = cli.load_config()?;

    match cli.command {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind_addr = bind;
            }
            serve(&config).await
        }
        Command::ClassEntities { action } => {
            let stores = AppStores::from_config(&config)?;
            let output = run_action(&stores.class_entities, action, config.store.default_page_size).await?;
            print_json(&output)
        }
        Command::Students { action } => {
            let stores = AppStores::from_config(&config)?;
            let output = run_action(&stores.students, action, config.store.default_page_size).await?;
            print_json(&output)
        }
    }
}

async fn serve(config: &Config) -> anyhow::Result<()> {
    let mut server = ResourceServer::new(&config.server)?;
    let addr = server.try_bind().await?;
    tracing::info!("Serving /api/class-entities and /api/students on http://{}", addr);
    server
        .run(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}

/// Run one action against a store and render the resulting state.
pub async fn run_action<E, A>(
    store: &EntityStore<E, A>,
    action: EntityAction,
    default_page_size: u32,
) -> anyhow::Result<Value>
where
    E: Entity,
    A: ResourceApi<E> + 'static,
{
    match action {
        EntityAction::List { page, size, sort } => {
            let request = PageRequest {
                page,
                size: size.unwrap_or(default_page_size),
                sort,
            };
            store.list(request).await?;
            let state = store.snapshot();
            Ok(json!({
                "totalItems": state.total_items,
                "entities": state.entities,
            }))
        }
        EntityAction::Get { id } => {
            store.get(id).await?;
            Ok(serde_json::to_value(store.snapshot().entity)?)
        }
        EntityAction::Create { json } => {
            store.create(parse_record(&json)?).await?;
            Ok(serde_json::to_value(store.snapshot().entity)?)
        }
        EntityAction::Update { json } => {
            store.update(parse_record(&json)?).await?;
            Ok(serde_json::to_value(store.snapshot().entity)?)
        }
        EntityAction::Patch { json } => {
            store.partial_update(parse_record(&json)?).await?;
            Ok(serde_json::to_value(store.snapshot().entity)?)
        }
        EntityAction::Delete { id } => {
            store.delete(id).await?;
            Ok(json!({ "deleted": id }))
        }
    }
}

fn parse_record<E: Entity>(raw: &str) -> anyhow::Result<E> {
    serde_json::from_str(raw).with_context(|| format!("Invalid {} JSON", E::NAME))
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
