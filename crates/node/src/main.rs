//! EpicChain Node - storage node daemon
//!
//! Opens the configured store and runs the requested maintenance actions.
//!
//! Usage:
//!   epicchain-node --config epicchain.toml --check-storage
//!   epicchain-node --dump 00000000

use anyhow::{Context, Result};
use clap::Parser;
use epicchain_config::NodeConfig;
use epicchain_node::{init_tracing, StorageSystem};
use epicchain_persistence::StoreFactory;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "epicchain-node", about = "EpicChain storage node daemon", version)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(long, short = 'c', env = "EPICCHAIN_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Overrides the configured storage path.
    #[arg(long, value_name = "PATH", env = "EPICCHAIN_STORAGE")]
    storage: Option<String>,

    /// Overrides the storage engine (provider name).
    #[arg(long, value_name = "ENGINE", env = "EPICCHAIN_BACKEND")]
    backend: Option<String>,

    /// Open storage read-only.
    #[arg(long, env = "EPICCHAIN_STORAGE_READONLY")]
    storage_read_only: bool,

    /// Override logging level.
    #[arg(long, value_name = "LEVEL", env = "EPICCHAIN_LOG_LEVEL")]
    logging_level: Option<String>,

    /// Override logging format (text, json, pretty).
    #[arg(long, value_name = "FORMAT", env = "EPICCHAIN_LOG_FORMAT")]
    logging_format: Option<String>,

    /// Validate configuration and exit.
    #[arg(long)]
    check_config: bool,

    /// Run a probe write against the store and exit.
    #[arg(long)]
    check_storage: bool,

    /// Print the stored entries whose raw key starts with this hex prefix.
    #[arg(long, value_name = "HEX_PREFIX")]
    dump: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut node_config = match &cli.config {
        Some(path) => NodeConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => NodeConfig::default(),
    };

    // Apply CLI overrides
    if let Some(backend) = &cli.backend {
        node_config.storage.engine = backend.clone();
    }
    if let Some(path) = &cli.storage {
        node_config.storage.path = path.clone();
    }
    if cli.storage_read_only {
        node_config.storage.read_only = true;
    }
    if let Some(level) = &cli.logging_level {
        node_config.logging.level = level.clone();
    }
    if let Some(format) = &cli.logging_format {
        node_config.logging.format = format.clone();
    }

    node_config.validate().context("configuration is invalid")?;
    init_tracing(&node_config.logging);

    if cli.check_config {
        info!(target: "epicchain", "configuration validated; exiting due to --check-config");
        return Ok(());
    }

    let factory = StoreFactory::new();
    let system = StorageSystem::open(&factory, &node_config.storage)?;

    if cli.check_storage {
        system.check_storage()?;
        info!(target: "epicchain", "storage check passed; exiting due to --check-storage");
        return Ok(());
    }

    if let Some(prefix) = &cli.dump {
        let prefix = hex::decode(prefix.trim())
            .with_context(|| format!("--dump expects a hex prefix, got '{prefix}'"))?;
        let entries = system.dump(&prefix)?;
        for (key, item) in &entries {
            println!("{key} = {}", hex::encode(item.value()));
        }
        info!(target: "epicchain", entries = entries.len(), "dump finished");
        return Ok(());
    }

    let entries = system.entry_count()?;
    info!(
        target: "epicchain",
        engine = system.engine(),
        read_only = system.is_read_only(),
        entries,
        "storage system ready"
    );
    Ok(())
}
